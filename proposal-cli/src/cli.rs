use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Arg, ArgGroup, Command};
use yansi::Paint;

use proposal_audit::{
    CallDecoder, CanonicalNode, InterfaceRegistry, LineKind, RawNode, RenderedLine,
    TreeNormalizer, render,
};

/// Loads every `<Name>.json` interface file from a directory.
///
/// Files register in file-name order, so the directory listing doubles as
/// the decode tie-break order; rename files to change which interface wins
/// a shared selector.
fn load_interfaces(dir: &Path) -> Result<InterfaceRegistry, Box<dyn Error>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut registry = InterfaceRegistry::new();
    for path in &paths {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let abi_json = fs::read_to_string(path)?;
        registry.register(name, &abi_json)?;
        tracing::debug!(path = %path.display(), "registered interface");
    }
    if registry.is_empty() {
        return Err(format!("no interface files found in {}", dir.display()).into());
    }
    Ok(registry)
}

fn paint(line: &RenderedLine) -> String {
    match line.kind {
        LineKind::Index | LineKind::ArrayKey | LineKind::HexList => line.text.yellow().to_string(),
        LineKind::CallLabel => line.text.blue().bold().to_string(),
        LineKind::SubcallKey => line.text.blue().to_string(),
        LineKind::StructKey => line.text.green().to_string(),
        LineKind::NullValue => line.text.cyan().dim().to_string(),
        LineKind::HexValue => line.text.magenta().to_string(),
        LineKind::ByteBlob | LineKind::Scalar => line.text.clone(),
    }
}

fn review(
    registry: InterfaceRegistry,
    raw: RawNode,
    output_format: &str,
) -> Result<(), Box<dyn Error>> {
    let decoder = CallDecoder::new(registry);
    let normalizer = TreeNormalizer::new(&decoder);
    let canonical = normalizer
        .normalize(&raw)
        .unwrap_or(CanonicalNode::Map(Default::default()));

    match output_format {
        "json" => println!("{}", serde_json::to_string_pretty(&canonical)?),
        _ => {
            for line in render(&canonical) {
                println!("{}", paint(&line));
            }
        }
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn Error>> {
    let matches = Command::new("proposal-audit")
        .version("1.0")
        .about("Decodes governance proposal call data for review")
        .arg(
            Arg::new("interfaces")
                .short('i')
                .long("interfaces")
                .value_name("DIR")
                .help("Directory of contract interface JSON files")
                .required(true),
        )
        .arg(
            Arg::new("payload")
                .short('p')
                .long("payload")
                .value_name("HEX")
                .help("Encoded call payload to decode"),
        )
        .arg(
            Arg::new("tree")
                .short('t')
                .long("tree")
                .value_name("FILE")
                .help("JSON file holding a decoded extrinsic call tree"),
        )
        .group(
            ArgGroup::new("input")
                .args(["payload", "tree"])
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FORMAT")
                .help("Output format")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .get_matches();

    let interfaces_dir = matches
        .get_one::<String>("interfaces")
        .expect("interfaces is required");
    let output_format = matches
        .get_one::<String>("output")
        .expect("output has a default value");

    let registry = load_interfaces(Path::new(interfaces_dir))?;

    let raw = if let Some(payload) = matches.get_one::<String>("payload") {
        RawNode::Text(payload.clone())
    } else {
        let path = matches
            .get_one::<String>("tree")
            .expect("input group requires payload or tree");
        let contents = fs::read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&contents)?;
        RawNode::from(value)
    };

    review(registry, raw, output_format)
}

/// operator cli
pub struct Cli;

impl Cli {
    /// Parses command line arguments and reviews the given proposal input
    pub fn execute() {
        if let Err(err) = run() {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
