// Command-line front end for movedelta.
//
// Subcommands decode a single resource-group value, read a coin balance
// through the fast path, walk a whole delta snapshot, or dump raw bytes.
// Every command reads hex either inline, from `--input`, or from stdin.

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use serde::Serialize;

use crate::hexdump::HexDump;
use crate::io::read_hex_input;
use crate::report::GroupReport;
use crate::resource::{AccountAddress, ValueFraming, coin_store_balance, decode_value};
use crate::snapshot::{DEFAULT_COIN_TYPE, Snapshot};

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Decoder for BCS resource-group values in Move delta snapshots.
#[derive(Parser, Debug)]
#[command(
    name = "movedelta",
    version,
    about = "BCS resource-group decoder",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Quiet mode (suppress non-error output on stderr).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Print results as JSON on stdout.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Decode one resource-group value (optionally wrapped in a write op).
    Group(GroupArgs),
    /// Read a CoinStore balance from a single resource value.
    Balance(HexArgs),
    /// Decode every resource group in a delta.json snapshot.
    Snapshot(SnapshotArgs),
    /// Hex dump of the raw bytes.
    Hexdump(HexdumpArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Args, Debug)]
struct HexArgs {
    /// Hex value, `0x` prefix optional (default: read from --input or stdin).
    hex: Option<String>,

    /// File containing the hex value.
    #[arg(long, short = 'i', value_hint = ValueHint::FilePath, conflicts_with = "hex")]
    input: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FramingArg {
    /// Unwrap a write-op envelope only when the bytes are not a bare group.
    Auto,
    /// The value is a Creation/Modification write op.
    WriteOp,
    /// The value is the group bytes themselves.
    Bare,
}

#[derive(Args, Debug)]
struct GroupArgs {
    #[command(flatten)]
    hex: HexArgs,

    /// How the value frames its group bytes.
    #[arg(long, value_enum, default_value_t = FramingArg::Auto)]
    framing: FramingArg,
}

#[derive(Args, Debug)]
struct HexdumpArgs {
    #[command(flatten)]
    hex: HexArgs,

    /// Start the dump at this byte offset (as reported in decode errors).
    #[arg(long, default_value_t = 0)]
    offset: usize,
}

#[derive(Args, Debug)]
struct SnapshotArgs {
    /// Snapshot file (JSON object of state key -> hex value).
    #[arg(value_hint = ValueHint::FilePath)]
    path: PathBuf,

    /// Only decode groups owned by this account.
    #[arg(long, short = 'a', value_parser = parse_address)]
    account: Option<AccountAddress>,

    /// Coin type used for the account balance lookup.
    #[arg(long = "coin-type", default_value = DEFAULT_COIN_TYPE)]
    coin_type: String,
}

fn parse_address(s: &str) -> Result<AccountAddress, String> {
    s.parse().map_err(|e| format!("invalid address '{s}': {e}"))
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Group,
    Balance,
    Snapshot,
    Hexdump,
    Config,
}

struct Options {
    command: Command,
    framing: ValueFraming,
    dump_offset: usize,
    quiet: bool,
    verbose: u8,
    json_output: bool,
    hex: Option<String>,
    input_file: Option<PathBuf>,
    snapshot_file: Option<PathBuf>,
    account: Option<AccountAddress>,
    coin_type: String,
}

fn resolve_options(cli: Cli) -> Options {
    let mut opts = Options {
        command: Command::Config,
        framing: ValueFraming::Auto,
        dump_offset: 0,
        quiet: cli.quiet,
        verbose: cli.verbose.min(2),
        json_output: cli.json_output,
        hex: None,
        input_file: None,
        snapshot_file: None,
        account: None,
        coin_type: DEFAULT_COIN_TYPE.to_string(),
    };

    let hex_args = match cli.command {
        Cmd::Group(args) => {
            opts.command = Command::Group;
            opts.framing = match args.framing {
                FramingArg::Auto => ValueFraming::Auto,
                FramingArg::WriteOp => ValueFraming::WriteOp,
                FramingArg::Bare => ValueFraming::Bare,
            };
            Some(args.hex)
        }
        Cmd::Balance(args) => {
            opts.command = Command::Balance;
            Some(args)
        }
        Cmd::Hexdump(args) => {
            opts.command = Command::Hexdump;
            opts.dump_offset = args.offset;
            Some(args.hex)
        }
        Cmd::Snapshot(args) => {
            opts.command = Command::Snapshot;
            opts.snapshot_file = Some(args.path);
            opts.account = args.account;
            opts.coin_type = args.coin_type;
            None
        }
        Cmd::Config => None,
    };
    if let Some(args) = hex_args {
        opts.hex = args.hex;
        opts.input_file = args.input;
    }
    opts
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("movedelta".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let _ = resolve_options(cli);
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_bytes(opts: &Options) -> Result<Vec<u8>, i32> {
    let bytes = read_hex_input(opts.hex.as_deref(), opts.input_file.as_deref()).map_err(|e| {
        eprintln!("movedelta: input: {e}");
        1
    })?;
    if opts.verbose > 0 && !opts.quiet {
        eprintln!("movedelta: input: {} bytes", bytes.len());
    }
    Ok(bytes)
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{text}");
            0
        }
        Err(e) => {
            eprintln!("movedelta: json output: {e}");
            1
        }
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_group(opts: &Options) -> i32 {
    let bytes = match read_bytes(opts) {
        Ok(b) => b,
        Err(code) => return code,
    };
    let report = GroupReport::from(&decode_value(&bytes, opts.framing));

    if opts.json_output {
        return print_json(&report);
    }
    print!("{report}");
    0
}

#[derive(Serialize)]
struct BalanceOutput {
    balance: Option<u64>,
}

fn cmd_balance(opts: &Options) -> i32 {
    let bytes = match read_bytes(opts) {
        Ok(b) => b,
        Err(code) => return code,
    };
    let balance = coin_store_balance(&bytes);

    if opts.json_output {
        return print_json(&BalanceOutput { balance });
    }
    match balance {
        Some(value) => println!("{value}"),
        None => println!("unavailable"),
    }
    0
}

#[derive(Serialize)]
struct SnapshotOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    coin_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    balance: Option<u64>,
    groups: Vec<GroupReport>,
}

fn cmd_snapshot(opts: &Options) -> i32 {
    let Some(path) = &opts.snapshot_file else {
        eprintln!("movedelta: snapshot requires a file");
        return 1;
    };
    let snapshot = match Snapshot::from_path(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("movedelta: snapshot: {e}");
            return 1;
        }
    };

    let groups = snapshot.resource_groups(opts.account.as_ref());
    let balance = opts
        .account
        .as_ref()
        .and_then(|a| snapshot.coin_balance(a, &opts.coin_type));

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "movedelta: snapshot: {} values, {} accounts, {} resource groups decoded",
            snapshot.len(),
            snapshot.accounts().len(),
            groups.len()
        );
    }

    if opts.json_output {
        return print_json(&SnapshotOutput {
            account: opts.account.map(|a| a.to_long_string()),
            coin_type: opts.account.map(|_| opts.coin_type.as_str()),
            balance,
            groups,
        });
    }

    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{group}");
    }
    if let Some(account) = &opts.account {
        if !groups.is_empty() {
            println!();
        }
        match balance {
            Some(value) => println!("balance of {account} ({}): {value}", opts.coin_type),
            None => println!("balance of {account} ({}): unavailable", opts.coin_type),
        }
    }
    0
}

fn cmd_hexdump(opts: &Options) -> i32 {
    let bytes = match read_bytes(opts) {
        Ok(b) => b,
        Err(code) => return code,
    };
    let Some(tail) = bytes.get(opts.dump_offset..) else {
        eprintln!(
            "movedelta: hexdump: offset {} is past the end ({} bytes)",
            opts.dump_offset,
            bytes.len()
        );
        return 1;
    };
    print!("{}", HexDump::new(tail).with_base_offset(opts.dump_offset));
    0
}

fn cmd_config() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("movedelta version {version}");

    let json = cfg!(feature = "json") as u8;
    let parallel = cfg!(feature = "parallel") as u8;

    eprintln!("JSON={json}");
    eprintln!("PARALLEL={parallel}");
    eprintln!("DEFAULT_COIN_TYPE={DEFAULT_COIN_TYPE}");
    eprintln!("HEXDUMP_BYTES_PER_LINE={}", crate::hexdump::BYTES_PER_LINE);

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();
    let opts = resolve_options(cli);

    let default_filter = match (opts.quiet, opts.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let exit_code = match opts.command {
        Command::Group => cmd_group(&opts),
        Command::Balance => cmd_balance(&opts),
        Command::Snapshot => cmd_snapshot(&opts),
        Command::Hexdump => cmd_hexdump(&opts),
        Command::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
