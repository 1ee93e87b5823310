#![allow(clippy::explicit_iter_loop)]

use anyhow::Context;
use bstr::ByteSlice;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

#[global_allocator]
static GLOBAL_MIMALLOC: mimalloc_rust::GlobalMiMalloc = mimalloc_rust::GlobalMiMalloc;

const USAGE: &str = "usage: tester <file-or-directory> [--print] [--verbose]";

struct Options {
    path: PathBuf,
    print: bool,
    verbose: bool,
}

fn parse_args() -> anyhow::Result<Options> {
    let mut path = None;
    let mut print = false;
    let mut verbose = false;
    for arg in std::env::args_os().skip(1) {
        match arg.to_str() {
            Some("--print") => print = true,
            Some("--verbose") => verbose = true,
            Some(flag) if flag.starts_with("--") => anyhow::bail!("unknown flag '{flag}'\n{USAGE}"),
            _ => path = Some(PathBuf::from(arg)),
        }
    }
    Ok(Options {
        path: path.context(USAGE)?,
        print,
        verbose,
    })
}

fn main() -> anyhow::Result<()> {
    let options = parse_args()?;
    tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(if options.verbose { tracing::Level::TRACE } else { tracing::Level::INFO })
        .init();

    let path = options.path.as_path();
    if path.is_dir() {
        let s = std::time::Instant::now();
        let mut len = 0;
        let mut failed = 0;

        for entry in walkdir::WalkDir::new(path).into_iter() {
            let entry = entry?;
            if entry.path().is_dir() || !is_srt(entry.path()) {
                continue;
            }

            match check_file(entry.path(), &options) {
                Ok(bytes) => len += bytes,
                Err(e) => {
                    tracing::error!("{:#}", e);
                    failed += 1;
                }
            }
        }

        tracing::info!(
            "{} bytes parsed in {:?}; {}MB/s",
            len,
            s.elapsed(),
            (len as f32 / 1024.0 / 1024.0) / s.elapsed().as_secs_f32()
        );
        if failed > 0 {
            anyhow::bail!("{failed} file(s) failed");
        }
    } else {
        check_file(path, &options)?;
    }

    Ok(())
}

fn is_srt(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("srt"))
}

/// Parses a file, reprints it and checks the canonical form parses back to itself.
fn check_file(path: &Path, options: &Options) -> anyhow::Result<usize> {
    tracing::info!("Parsing '{}'", path.display());

    let s = std::time::Instant::now();
    let content = std::fs::read(path).with_context(|| format!("cannot read '{}'", path.display()))?;
    let text = content
        .to_str()
        .with_context(|| format!("'{}' is not valid UTF-8", path.display()))?;

    let document = srt::parse(text).with_context(|| format!("cannot parse '{}'", path.display()))?;
    let canonical = srt::print(&document).with_context(|| format!("cannot print '{}'", path.display()))?;
    let reparsed = srt::parse(&canonical)
        .with_context(|| format!("canonical form of '{}' does not parse", path.display()))?;
    if reparsed != document {
        anyhow::bail!("canonical form of '{}' parses to a different document", path.display());
    }

    if options.print {
        println!("{canonical}");
    }

    tracing::info!(
        "{} cues in {} bytes parsed in {:?}; {}MB/s",
        document.cues.len(),
        content.len(),
        s.elapsed(),
        (content.len() as f32 / 1024.0 / 1024.0) / s.elapsed().as_secs_f32()
    );

    Ok(content.len())
}
