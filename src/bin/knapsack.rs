//! Minimal CLI around the Merkle–Hellman knapsack primitives.
//!
//! With no subcommand it behaves like the classic demo: read the plaintext
//! from `--text` or the `TEXT` environment variable, generate a fresh key
//! pair, and print the original, encrypted and decrypted messages.  The
//! remaining subcommands split that flow across JSON key files.

use std::{env, path::PathBuf};

use mh_knapsack::{
    format_cipher_values, generate_key_pair, parse_cipher_values, read_key_pair, write_key_pair,
    KeyGenConfig, KeyPair, KnapsackError, SimplePrng,
};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const TEXT_ENV: &str = "TEXT";

fn fatal(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn print_help() {
    println!("Usage: knapsack [demo|keygen|encrypt|decrypt] [flags]");
    println!("  demo    [--text <s>] [--seed <u64>] [--max-step <u64>]");
    println!("  keygen  --out <file> [--seed <u64>] [--max-step <u64>]");
    println!("  encrypt --key <file> [--text <s>]");
    println!("  decrypt --key <file> --cipher \"<v1 v2 ...>\"");
    println!("Plaintext falls back to the {TEXT_ENV} environment variable.");
    println!("Pass -v / --verbose for debug logging on stderr.");
}

#[derive(Debug, Default)]
struct Options {
    text: Option<String>,
    seed: Option<u64>,
    max_step: Option<u64>,
    key: Option<PathBuf>,
    out: Option<PathBuf>,
    cipher: Option<String>,
    verbose: bool,
}

fn parse_options(args: Vec<String>) -> Options {
    let mut opts = Options::default();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .unwrap_or_else(|| fatal(&format!("{flag} expects a value")))
        };
        match arg.as_str() {
            "--text" => opts.text = Some(value("--text")),
            "--seed" => {
                opts.seed = Some(
                    value("--seed")
                        .parse()
                        .unwrap_or_else(|_| fatal("invalid --seed value")),
                )
            }
            "--max-step" => {
                opts.max_step = Some(
                    value("--max-step")
                        .parse()
                        .unwrap_or_else(|_| fatal("invalid --max-step value")),
                )
            }
            "--key" => opts.key = Some(PathBuf::from(value("--key"))),
            "--out" => opts.out = Some(PathBuf::from(value("--out"))),
            "--cipher" => opts.cipher = Some(value("--cipher")),
            "-v" | "--verbose" => opts.verbose = true,
            other => fatal(&format!("unknown argument: {other}")),
        }
    }
    opts
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install logger: {err}");
    }
}

fn main() {
    let mut args: Vec<String> = env::args().skip(1).collect();
    let command = match args.first().map(String::as_str) {
        Some("demo") | Some("keygen") | Some("encrypt") | Some("decrypt") => args.remove(0),
        Some("-h") | Some("--help") => {
            print_help();
            return;
        }
        _ => "demo".to_string(),
    };
    let opts = parse_options(args);
    init_tracing(opts.verbose);

    let outcome = match command.as_str() {
        "demo" => cmd_demo(&opts),
        "keygen" => cmd_keygen(&opts),
        "encrypt" => cmd_encrypt(&opts),
        "decrypt" => cmd_decrypt(&opts),
        _ => unreachable!("command already matched"),
    };
    if let Err(err) = outcome {
        fatal(&err.to_string());
    }
}

fn plaintext(opts: &Options) -> Result<String, KnapsackError> {
    if let Some(text) = &opts.text {
        return Ok(text.clone());
    }
    env::var(TEXT_ENV).map_err(|_| {
        KnapsackError::Input(format!(
            "no plaintext: pass --text or set the {TEXT_ENV} environment variable"
        ))
    })
}

fn fresh_key_pair(opts: &Options) -> Result<KeyPair, KnapsackError> {
    let (mut rng, seed) = match opts.seed {
        Some(seed) => (SimplePrng::new(seed), seed),
        None => SimplePrng::from_time(),
    };
    let config = opts
        .max_step
        .map(KeyGenConfig::new)
        .unwrap_or_default();
    let pair = generate_key_pair(&mut rng, &config)?;
    info!(seed, fingerprint = %pair.fingerprint(), "key pair ready");
    Ok(pair)
}

fn load_key_pair(opts: &Options) -> Result<KeyPair, KnapsackError> {
    let path = opts
        .key
        .as_ref()
        .unwrap_or_else(|| fatal("--key <file> is required"));
    let pair = read_key_pair(path)?;
    info!(path = %path.display(), fingerprint = %pair.fingerprint(), "loaded key pair");
    Ok(pair)
}

fn cmd_demo(opts: &Options) -> Result<(), KnapsackError> {
    let message = plaintext(opts)?;
    let pair = fresh_key_pair(opts)?;
    let cipher = pair.encrypt(message.as_bytes());
    println!("Original Message: {message}");
    println!("Encrypted Message: {}", format_cipher_values(&cipher));
    let decrypted = pair.decrypt(&cipher)?;
    println!("Decrypted Message: {}", String::from_utf8_lossy(&decrypted));
    Ok(())
}

fn cmd_keygen(opts: &Options) -> Result<(), KnapsackError> {
    let out = opts
        .out
        .as_ref()
        .unwrap_or_else(|| fatal("--out <file> is required"));
    let pair = fresh_key_pair(opts)?;
    let path = write_key_pair(out, &pair)?;
    println!("key pair written to {}", path.display());
    println!("fingerprint: {}", pair.fingerprint());
    Ok(())
}

fn cmd_encrypt(opts: &Options) -> Result<(), KnapsackError> {
    let message = plaintext(opts)?;
    let pair = load_key_pair(opts)?;
    println!("{}", format_cipher_values(&pair.encrypt(message.as_bytes())));
    Ok(())
}

fn cmd_decrypt(opts: &Options) -> Result<(), KnapsackError> {
    let line = opts
        .cipher
        .as_deref()
        .unwrap_or_else(|| fatal("--cipher \"<values>\" is required"));
    let cipher = parse_cipher_values(line)?;
    let pair = load_key_pair(opts)?;
    let plain = pair.decrypt(&cipher)?;
    println!("{}", String::from_utf8_lossy(&plain));
    Ok(())
}
