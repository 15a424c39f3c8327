//! Command-line interface for modview
//! This binary renders a JavaScript source together with the module-lexer records recorded for it.
//!
//! Usage:
//!   modview render `<source>` --records `<file>` [--format `<format>`]  - Render the reconciled source
//!   modview formats                                                - List available output formats
//!   modview capabilities `<version>`                                 - Show what a lexer release reports

use clap::{Arg, ArgAction, ArgMatches, Command};
use colored::{Color, Colorize};
use log::{Level, LevelFilter};
use modview::modview::config::{Loader, ModviewConfig};
use modview::modview::formats::FormatRegistry;
use modview::modview::lexer::RecordedLexer;
use modview::modview::version::Capabilities;
use std::io;

fn main() {
    let matches = Command::new("modview")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect ES module lexer output against the source it was produced from")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the defaults (default: ./modview.toml if present)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log output (-v info, -vv debug, -vvv trace)"),
        )
        .subcommand(
            Command::new("render")
                .about("Render a source with its lexer records")
                .arg(
                    Arg::new("source")
                        .help("Path to the JavaScript source")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("records")
                        .long("records")
                        .short('r')
                        .required(true)
                        .help("Recorded lexer output (.json, .yaml or .yml)"),
                )
                .arg(
                    Arg::new("lexer-version")
                        .long("lexer-version")
                        .help("Release of the lexer that produced the records (e.g. '1.5.4')"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (e.g., 'tag', 'treeviz', 'json')"),
                )
                .arg(
                    Arg::new("offsets")
                        .long("offsets")
                        .value_parser(["utf8", "utf16"])
                        .help("Unit of the record offsets"),
                ),
        )
        .subcommand(Command::new("formats").about("List available output formats"))
        .subcommand(
            Command::new("capabilities")
                .about("Show what a lexer release reports")
                .arg(
                    Arg::new("version")
                        .help("Lexer release, e.g. '0.9.0'")
                        .required(true)
                        .index(1),
                ),
        )
        .get_matches();

    let sub = matches.subcommand().map(|(_, m)| m).unwrap_or(&matches);
    let config = load_config(sub);
    init_logging(config.log.level, sub.get_count("verbose"));

    match matches.subcommand() {
        Some(("render", render_matches)) => {
            let source = render_matches.get_one::<String>("source").unwrap();
            let records = render_matches.get_one::<String>("records").unwrap();
            handle_render_command(&config, source, records);
        }
        Some(("formats", _)) => handle_formats_command(&config),
        Some(("capabilities", caps_matches)) => {
            let version = caps_matches.get_one::<String>("version").unwrap();
            handle_capabilities_command(version);
        }
        _ => unreachable!(),
    }
}

/// Defaults, then the config file, then command-line flags.
fn load_config(sub: &ArgMatches) -> ModviewConfig {
    let mut loader = Loader::new();
    loader = match sub.get_one::<String>("config") {
        Some(path) => loader.with_file(path),
        None => loader.with_optional_file("modview.toml"),
    };

    let overrides = [
        ("lexer-version", "lexer.version"),
        ("format", "render.format"),
        ("offsets", "render.offsets"),
    ];
    for (flag, key) in overrides {
        let value = sub
            .try_get_one::<String>(flag)
            .ok()
            .flatten()
            .map(String::as_str);
        loader = loader.set_override(key, value).unwrap_or_else(|e| {
            eprintln!("Error: invalid --{}: {}", flag, e);
            std::process::exit(1);
        });
    }

    loader.build().unwrap_or_else(|e| {
        eprintln!("Error loading configuration: {}", e);
        std::process::exit(1);
    })
}

fn init_logging(configured: LevelFilter, verbosity: u8) {
    let level = match verbosity {
        0 => configured,
        1 => configured.max(LevelFilter::Info),
        2 => configured.max(LevelFilter::Debug),
        _ => LevelFilter::Trace,
    };

    let result = fern::Dispatch::new()
        .format(|out, message, record| {
            let color = match record.level() {
                Level::Error => Color::Red,
                Level::Warn => Color::Yellow,
                Level::Info => Color::Blue,
                Level::Debug => Color::Magenta,
                Level::Trace => Color::Green,
            };
            let prefix = format!("{}:", record.level().to_string().to_lowercase());
            out.finish(format_args!("{} {}", prefix.as_str().color(color), message))
        })
        .level(level)
        .chain(io::stderr())
        .apply();
    if let Err(e) = result {
        eprintln!("Warning: logging unavailable: {}", e);
    }
}

/// Handle the render command
fn handle_render_command(config: &ModviewConfig, source_path: &str, records_path: &str) {
    let source = std::fs::read_to_string(source_path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    });

    let lexer = RecordedLexer::from_path(records_path, config.lexer.version.clone())
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    let pipeline = config.pipeline().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let mut registry = FormatRegistry::with_defaults();
    registry.register(config.treeviz_formatter());

    let output = pipeline
        .run(&source, &lexer)
        .map_err(|e| e.to_string())
        .and_then(|annotated| {
            registry
                .serialize(&annotated, &config.render.format)
                .map_err(|e| e.to_string())
        })
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    if output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }
}

/// Handle the formats command
fn handle_formats_command(config: &ModviewConfig) {
    let mut registry = FormatRegistry::with_defaults();
    registry.register(config.treeviz_formatter());

    println!("Available formats:\n");
    for name in registry.list_formats() {
        let description = registry
            .get(&name)
            .map(|f| f.description())
            .unwrap_or_default();
        let marker = if name == config.render.format {
            " (default)"
        } else {
            ""
        };
        println!("  {}{}", name, marker);
        println!("    {}", description);
    }
}

/// Handle the capabilities command
fn handle_capabilities_command(version: &str) {
    match Capabilities::for_version(version) {
        Ok(capabilities) => println!("{}", capabilities),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
