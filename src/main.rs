//! Demo CLI: runs a full handshake between two in-process parties and
//! prints the agreed shared secret.

use std::env;
use std::process::ExitCode;

use subtle::ConstantTimeEq;

use ringlwe_kex::oracle::{Oracles, OsRandom, Shake256Stream, Shake256Xof};
use ringlwe_kex::{agree_a, agree_b, keygen};

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn run() -> Result<(), String> {
    let xof = Shake256Xof;
    let stream = Shake256Stream;

    let mut random_a = OsRandom;
    let mut oracles_a = Oracles {
        random: &mut random_a,
        xof: &xof,
        stream: &stream,
    };
    let (pk_a, sk_a) = keygen(&mut oracles_a).map_err(|e| e.to_string())?;
    println!("PublicKeyA: {} bytes", pk_a.to_bytes().len());

    let mut random_b = OsRandom;
    let mut oracles_b = Oracles {
        random: &mut random_b,
        xof: &xof,
        stream: &stream,
    };
    let (pk_b, secret_b) = agree_b(&mut oracles_b, &pk_a).map_err(|e| e.to_string())?;
    println!("PublicKeyB: {} bytes", pk_b.to_bytes().len());

    let secret_a = agree_a(&sk_a, &pk_b).map_err(|e| e.to_string())?;

    if secret_a[..].ct_eq(&secret_b[..]).unwrap_u8() == 0 {
        return Err("shared secrets disagree".to_string());
    }

    println!("shared secret: {}", to_hex(&secret_a));
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    if env::args().any(|a| a == "--help" || a == "-h") {
        println!("kex-demo: runs a Ring-LWE handshake and prints the shared secret");
        return ExitCode::SUCCESS;
    }
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("kex-demo: {msg}");
            ExitCode::FAILURE
        }
    }
}
