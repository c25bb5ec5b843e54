//! Headless replay shell: feed an event script to a dispatcher, print the
//! resulting document.

mod script;

use polysketch_core::{Dispatcher, Document, FileSink, GridConfig};
use polysketch_render::SvgRenderer;
use std::error::Error;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "usage: polysketch [SCRIPT] [--svg PATH] [--save PATH] [--no-snap]
  SCRIPT       event script file (stdin when omitted or '-')
  --svg PATH   write the rendered scene as SVG
  --save PATH  persist the document to PATH after every change
  --no-snap    disable grid snapping";

struct Args {
    script: Option<PathBuf>,
    svg: Option<PathBuf>,
    save: Option<PathBuf>,
    snap: bool,
}

fn parse_args(mut args: std::env::Args) -> Result<Args, String> {
    let mut parsed = Args {
        script: None,
        svg: None,
        save: None,
        snap: true,
    };
    args.next(); // program name
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--svg" => parsed.svg = Some(args.next().ok_or("--svg needs a path")?.into()),
            "--save" => parsed.save = Some(args.next().ok_or("--save needs a path")?.into()),
            "--no-snap" => parsed.snap = false,
            "--help" | "-h" => return Err(USAGE.to_string()),
            "-" => parsed.script = None,
            other if other.starts_with('-') => return Err(format!("unknown option {other}")),
            other => parsed.script = Some(other.into()),
        }
    }
    Ok(parsed)
}

fn read_script(path: Option<&PathBuf>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let events = script::parse(&read_script(args.script.as_ref())?)?;
    log::info!("replaying {} events", events.len());

    let mut document = Document::new();
    if let Some(path) = &args.save {
        document.set_sink(Box::new(FileSink::new(path)));
    }

    let mut dispatcher = Dispatcher::with_document(document, SvgRenderer::new());
    if !args.snap {
        dispatcher.set_grid(GridConfig::disabled());
    }

    for event in events {
        dispatcher.handle(event);
    }

    print!("{}", dispatcher.document().to_text());
    if let Some(path) = &args.svg {
        std::fs::write(path, dispatcher.renderer().to_svg())?;
        log::info!("scene written to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = match parse_args(std::env::args()) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = run(args) {
        eprintln!("polysketch: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
