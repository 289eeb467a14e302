use anyhow::Context;
use clap::{ArgAction, Parser};
use gpmfbox::{
    DecodeOptions, DecodedValue, FourCC, Gpmf, KnownKey, LogObserver, Node, TypeTag,
    decode_range, highlights::format_millis, hex_range, is_mp4, locate_metadata,
    read_highlights,
};
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Convert GoPro GPMF metadata to JSON")]
struct Args {
    /// GoPro MP4 file, or a raw GPMF stream
    path: PathBuf,

    /// Write <path>.json instead of printing to stdout
    #[arg(short, long, action = ArgAction::SetTrue)]
    output: bool,

    /// Log every record as it is decoded
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Treat the input as a raw GPMF stream even if it looks like MP4
    #[arg(long, action = ArgAction::SetTrue)]
    raw: bool,

    /// Skip unknown type tags instead of failing
    #[arg(long, action = ArgAction::SetTrue)]
    permissive: bool,

    /// Metadata box under moov/udta
    #[arg(long, default_value = "GPMF")]
    tag: String,

    /// Limit container nesting
    #[arg(long, default_value_t = 64)]
    max_depth: usize,

    /// Print a human-readable tree instead of JSON
    #[arg(long, action = ArgAction::SetTrue)]
    tree: bool,

    /// Print the HMMT highlight times and exit
    #[arg(long, action = ArgAction::SetTrue)]
    highlights: bool,

    /// Hex-dump the first N bytes of the metadata range and exit
    #[arg(long)]
    hex: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let tag = FourCC::from_str(&args.tag)
        .with_context(|| format!("--tag must be four characters, got {:?}", args.tag))?;

    let mut f = File::open(&args.path)
        .with_context(|| format!("opening {}", args.path.display()))?;
    let size = f.seek(SeekFrom::End(0))?;
    log::info!("File size is {size} bytes.");

    let mp4 = !args.raw && is_mp4(&mut f, size)?;

    if args.highlights {
        anyhow::ensure!(mp4, "highlights are only stored in MP4 files");
        let atom = locate_metadata(&mut f, size, FourCC::HMMT)?;
        let times = read_highlights(&mut f, &atom)?;
        println!("Found {} highlight(s)", times.len());
        for t in times {
            println!("{}", format_millis(t));
        }
        return Ok(());
    }

    let range = if mp4 {
        let atom = locate_metadata(&mut f, size, tag)
            .with_context(|| format!("locating moov/udta/{tag}"))?;
        log::info!("{} box at [{}, {})", atom.tag, atom.start, atom.end);
        atom.payload()
    } else {
        0..size
    };

    if let Some(n) = args.hex {
        let dump = hex_range(&mut f, range.end, range.start, n)?;
        print!("{}", dump.hex);
        return Ok(());
    }

    let opts = DecodeOptions::new()
        .permissive(args.permissive)
        .with_max_depth(args.max_depth);
    let gpmf = decode_range(&mut f, range.start, range.end, &opts, &mut LogObserver)
        .with_context(|| format!("decoding {}", args.path.display()))?;
    drop(f);

    if args.tree {
        print_tree(&gpmf);
        return Ok(());
    }

    let json = serde_json::to_string(&gpmf)?;
    if args.output {
        let mut out = args.path.clone().into_os_string();
        out.push(".json");
        log::info!("Writing to file {}", PathBuf::from(&out).display());
        std::fs::write(&out, json)?;
    } else {
        println!("{json}");
    }

    Ok(())
}

// ---------- Human-readable tree ----------

fn print_tree(gpmf: &Gpmf) {
    for node in gpmf.iter() {
        print_node(node, 0);
    }
}

fn print_node(node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);
    let known = KnownKey::from(node.key);
    let name = if known.is_unknown() {
        String::new()
    } else {
        format!(" ({})", known.full_name())
    };

    match node.type_tag() {
        Some(TypeTag::Container) => {
            println!("{indent}{}{name} [{} children]", node.key, node.children().len());
            for child in node.children() {
                print_node(child, depth + 1);
            }
        }
        tag => {
            let type_name = tag.map(TypeTag::full_name).unwrap_or("unsupported");
            println!(
                "{indent}{}{name} '{}' {}x{} {type_name}: {}",
                node.key,
                node.type_tag as char,
                node.element_size,
                node.repeat_count,
                summarize(node.samples())
            );
        }
    }
}

fn summarize(samples: &[DecodedValue]) -> String {
    const SHOWN: usize = 3;
    let mut parts: Vec<String> = samples
        .iter()
        .take(SHOWN)
        .map(|s| match s {
            DecodedValue::Text(t) => format!("{t:?}"),
            DecodedValue::Timestamp(Some(t)) => t.to_string(),
            DecodedValue::Timestamp(None) => "<invalid time>".to_string(),
            other => format!("{:?}", other.to_f64s().unwrap_or_default()),
        })
        .collect();
    if samples.len() > SHOWN {
        parts.push(format!("... ({} total)", samples.len()));
    }
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(", ")
    }
}
