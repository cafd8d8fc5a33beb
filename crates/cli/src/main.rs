//! CLI tool for turning stanza text into PowerPoint slide decks.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lyric_core::{Slide, DEFAULT_LAYOUT_INDEX};
use lyric_pptx::{
    create_template, DeckGenerator, DeckReader, GenerationReport, GeneratorConfig,
    DEFAULT_OUTPUT_NAME, DEFAULT_TEMPLATE_PATH,
};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Build PowerPoint slide decks from lyrics, one slide per stanza.
#[derive(Parser, Debug)]
#[command(name = "lyric-slides")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a deck with one slide per stanza.
    Generate {
        /// Text file with stanzas separated by blank lines (stdin if omitted or "-")
        input: Option<PathBuf>,

        /// Template presentation to build slides from
        #[arg(short, long, default_value = DEFAULT_TEMPLATE_PATH)]
        template: PathBuf,

        /// Output file; ".pptx" is appended unless the name already ends in it
        #[arg(short, long, default_value = DEFAULT_OUTPUT_NAME)]
        output: PathBuf,

        /// Index of the slide layout each slide is built from
        #[arg(short, long, default_value_t = DEFAULT_LAYOUT_INDEX)]
        layout: usize,

        /// Print a JSON report instead of a message
        #[arg(long)]
        json: bool,
    },

    /// Write the bundled starter template.
    InitTemplate {
        /// Where to write the template
        #[arg(short, long, default_value = DEFAULT_TEMPLATE_PATH)]
        template: PathBuf,
    },

    /// List the slides and shape text of an existing deck.
    Inspect {
        /// Deck to read
        deck: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    run(args.command)
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Generate {
            input,
            template,
            output,
            layout,
            json,
        } => {
            let text = read_input(input.as_deref())?;
            log::debug!("Read {} bytes of lyrics", text.len());
            let config = GeneratorConfig::default()
                .with_template(template)
                .with_layout_index(layout);
            let report = DeckGenerator::new(config).generate(&text, &output)?;
            print_report(&report, json)
        }
        Command::InitTemplate { template } => {
            create_template(&template)
                .with_context(|| format!("Failed to create template {}", template.display()))?;
            println!("Created template at {}", template.display());
            Ok(())
        }
        Command::Inspect { deck, json } => inspect(&deck, json),
    }
}

/// Read the lyrics from a file, or from stdin for `None` and `-`.
fn read_input(input: Option<&Path>) -> Result<String> {
    let mut text = String::new();
    match input {
        Some(path) if path != Path::new("-") => {
            let file =
                File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            BufReader::new(file)
                .read_to_string(&mut text)
                .with_context(|| format!("Failed to read {}", path.display()))?;
        }
        _ => {
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
        }
    }
    Ok(text)
}

fn print_report(report: &GenerationReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("Saved presentation to {}", report.output.display());
    }
    Ok(())
}

/// Print the slides of a deck.
fn inspect(deck: &Path, json: bool) -> Result<()> {
    let file = File::open(deck).with_context(|| format!("Failed to open {}", deck.display()))?;
    let contents = DeckReader::new()
        .read(BufReader::new(file))
        .with_context(|| format!("Failed to read {}", deck.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&contents)?);
        return Ok(());
    }

    for slide in &contents.slides {
        print!("{}", describe_slide(slide));
    }
    Ok(())
}

/// Human-readable outline of one slide.
fn describe_slide(slide: &Slide) -> String {
    let mut out = format!(
        "Slide {} ({})\n",
        slide.number,
        slide.layout_name.as_deref().unwrap_or("unknown layout")
    );
    for shape in &slide.shapes {
        out.push_str(&format!("  [{}]", shape.name));
        if let Some(geometry) = shape.geometry {
            out.push_str(&format!(
                " at ({}, {}) size {}x{}",
                geometry.left, geometry.top, geometry.width, geometry.height
            ));
        }
        out.push('\n');
        for line in shape.text().lines() {
            out.push_str(&format!("    {}\n", line));
        }
    }
    out
}
