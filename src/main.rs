use clap::{Parser, Subcommand};

use ferrous_lanes::compute::simd_abstraction::simd::{
    available_engines, has_bmi2, simd_engine_description, simd_lane_counts,
};
use ferrous_lanes::compute::{backend_description, detect_optimal_backend};
use ferrous_lanes::core::BitPermute;
use ferrous_lanes::lanes::{ElementKind, Species};
use ferrous_lanes::verify::run_verify;
use ferrous_lanes::verify_opt::VerifyCliOptions;

#[derive(Parser)]
#[command(name = "ferrous-lanes")]
#[command(about = "FerrousLanes - SIMD lane vectors and branch-free bit compress/expand", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report detected SIMD engines and preferred vector species
    Probe,

    /// Gather the bits of VALUE selected by MASK into the low bits
    Compress(WordArgs),

    /// Scatter the low bits of VALUE into the positions selected by MASK
    Expand(WordArgs),

    /// Sheep-and-goats: masked bits to the high end, the rest to the low end
    Sag(WordArgs),

    /// Run randomized self-verification of every kernel against scalar loops
    Verify(VerifyCliOptions),
}

#[derive(clap::Args)]
struct WordArgs {
    /// Input word (decimal, or hexadecimal with 0x prefix)
    #[arg(value_name = "VALUE", value_parser = parse_word)]
    value: u64,

    /// Bit mask (decimal, or hexadecimal with 0x prefix)
    #[arg(value_name = "MASK", value_parser = parse_word)]
    mask: u64,

    /// Operate on 64-bit words instead of 32-bit
    #[arg(short = 'w', long)]
    wide: bool,
}

/// Parse "0xCAFEBABE", "0b1010" or decimal into a word
fn parse_word(s: &str) -> Result<u64, String> {
    let s = s.replace('_', "");
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else if let Some(bin) = s.strip_prefix("0b") {
        u64::from_str_radix(bin, 2)
    } else {
        s.parse::<u64>()
    };
    parsed.map_err(|e| format!("Invalid word '{}': {}", s, e))
}

fn init_logger(verbosity: u8) {
    // Verbosity: 1=error, 2=warning, 3=message, 4=debug, 5+=trace
    let log_level = match verbosity {
        v if v <= 1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        4 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None) // Don't show timestamps
        .format_target(false) // Don't show module names
        .init();
}

fn run_word_op(args: &WordArgs, op32: fn(u32, u32) -> u32, op64: fn(u64, u64) -> u64) {
    if args.wide {
        println!("{:#018x}", op64(args.value, args.mask));
        return;
    }
    match (u32::try_from(args.value), u32::try_from(args.mask)) {
        (Ok(value), Ok(mask)) => println!("{:#010x}", op32(value, mask)),
        _ => {
            log::error!("VALUE and MASK must fit in 32 bits; pass --wide for 64-bit words");
            std::process::exit(1);
        }
    }
}

fn probe() {
    let backend = detect_optimal_backend();
    println!("Permute backend: {}", backend_description(backend));
    println!("BMI2 (PEXT/PDEP): {}", if has_bmi2() { "yes" } else { "no" });
    println!("Engines:");
    for engine in available_engines() {
        let (lanes32, lanes64) = simd_lane_counts(engine);
        println!(
            "  {:<40} {:>2} x u32  {:>2} x u64",
            simd_engine_description(engine),
            lanes32,
            lanes64
        );
    }
    println!("Preferred species:");
    for kind in ElementKind::ALL {
        println!("  {}", Species::preferred(kind));
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Probe => {
            init_logger(3);
            probe();
        }
        Commands::Compress(args) => {
            init_logger(2);
            run_word_op(&args, u32::compress_bits, u64::compress_bits);
        }
        Commands::Expand(args) => {
            init_logger(2);
            run_word_op(&args, u32::expand_bits, u64::expand_bits);
        }
        Commands::Sag(args) => {
            init_logger(2);
            run_word_op(&args, u32::sheep_and_goats, u64::sheep_and_goats);
        }
        Commands::Verify(cli_opts) => {
            init_logger(cli_opts.verbosity);

            let opt = match cli_opts.to_opt() {
                Ok(opt) => opt,
                Err(e) => {
                    log::error!("{}", e);
                    std::process::exit(1);
                }
            };

            match run_verify(&opt) {
                Ok(report) => {
                    println!("{}", report);
                    if !report.passed() {
                        std::process::exit(1);
                    }
                }
                Err(e) => {
                    log::error!("Verification failed: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}
