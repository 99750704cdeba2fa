use anyhow::Result;
use clap::{Parser, Subcommand};

/// Regex to minimal DFA by direct construction (followpos)
#[derive(Parser, Debug)]
#[command(name = "followpos")]
#[command(about = "Builds the DFA of [FIRST][REST]* straight from its syntax tree and minimizes it", long_about = None)]
struct Args {
    /// Characters allowed as first symbol, `x-y` is a range
    #[arg(long, global = true, default_value = "A-Za-z_")]
    first: String,

    /// Characters allowed after the first symbol
    #[arg(long, global = true, default_value = "A-Za-z_0-9")]
    rest: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prints the syntax tree
    Tree {
        /// Graphviz output
        #[arg(long)]
        dot: bool,
    },
    /// Prints nullable, firstpos and lastpos of every node and the followpos table
    Functions,
    /// Builds the DFA and prints its transition table
    Dfa {
        #[arg(long)]
        dot: bool,
    },
    /// Builds and minimizes the DFA
    Minimize {
        #[arg(long)]
        dot: bool,
    },
    /// Runs the DFA on every word
    Simulate {
        #[arg(value_name = "WORDS", required = true)]
        words: Vec<String>,

        /// Use the minimized DFA
        #[arg(long)]
        minimized: bool,

        /// Print the visited states
        #[arg(long)]
        trace: bool,
    },
    /// Checks the words with the Java identifier matcher compiled into the binary
    Check {
        #[arg(value_name = "WORDS", required = true)]
        words: Vec<String>,
    },
}

fn tree(args: &Args) -> Result<followpos_core::syntax::Node> {
    followpos::build_tree(&args.first, &args.rest)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let out = match &args.command {
        Command::Tree { dot } => followpos::tree_report(&tree(&args)?, *dot),
        Command::Functions => followpos::functions_report(&tree(&args)?),
        Command::Dfa { dot } => followpos::dfa_report(&tree(&args)?, *dot)?,
        Command::Minimize { dot } => followpos::minimize_report(&tree(&args)?, *dot)?,
        Command::Simulate { words, minimized, trace } => {
            followpos::simulate_report(&tree(&args)?, words, *minimized, *trace)?
        },
        Command::Check { words } => {
            if args.first != "A-Za-z_" || args.rest != "A-Za-z_0-9" {
                eprintln!("Warning: check always uses the built-in Java identifier pattern, --first and --rest are ignored");
            }
            followpos::check_report(words)
        },
    };
    print!("{}", out);

    Ok(())
}
