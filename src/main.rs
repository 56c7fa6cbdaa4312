use chrono::{DateTime, Utc};
use clap::Parser;
use computed_formula::{parse_record, EvalOptions, Evaluator, Value};
use tracing::Level;

/// Evaluate a formula (or a `{{ }}` template) against JSON records.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Formula, e.g. `SUM(a, MULTIPLY(b, 2))`
    expression: String,
    /// Record the formula reads from (JSON object)
    #[arg(long, default_value = "{}")]
    values: String,
    /// Fallback record for missing or null fields (JSON object)
    #[arg(long, default_value = "{}")]
    defaults: String,
    /// Fail on unresolvable expressions and log evaluation steps
    #[arg(long)]
    debug: bool,
    /// Treat the input as a template with `{{ ... }}` placeholders
    #[arg(long)]
    template: bool,
    /// Freeze `$NOW` at this RFC 3339 instant
    #[arg(long)]
    now: Option<DateTime<Utc>>,
    /// Deepest operator nesting to evaluate
    #[arg(long, default_value_t = 256)]
    max_depth: usize,
}

fn read_record(name: &str, raw: &str) -> Value {
    match parse_record(raw) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("--{name}: {e}");
            std::process::exit(1);
        }
    }
}

fn main() {
    // Parse CLI arguments.
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.debug { Level::TRACE } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let values = read_record("values", &args.values);
    let defaults = read_record("defaults", &args.defaults);

    let mut options = EvalOptions::default()
        .debug(args.debug)
        .max_depth(args.max_depth);
    if let Some(now) = args.now {
        options = options.frozen_at(now);
    }
    let evaluator = Evaluator::new(options);

    let result = if args.template {
        evaluator.render(&args.expression, &values, &defaults)
    } else {
        evaluator.eval(&args.expression, &values, &defaults)
    };

    match result {
        Ok(out) => match serde_json::to_string_pretty(&out) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Cannot serialize result: {e}");
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
