use anyhow::{anyhow, bail, Context, Result};
use curvereamer::*;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default)]
struct Options {
    drawing: PathBuf,
    path_index: usize,
    floor_height: Option<f64>,
    out: Option<PathBuf>,
    settings: Option<PathBuf>,
}

fn main() {
    if let Err(err) = init_logging() {
        eprintln!("Logging disabled: {err}");
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("Error: {err:#}\n");
            print_usage();
            std::process::exit(2);
        }
    };

    if let Err(err) = run(&options) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!("Usage: curvereamer <drawing.svg> [options]");
    println!("  --path N          - Index of the path to ream (default 0)");
    println!("  --floor-height H  - Floor height in mm for the volume estimate");
    println!("  --out FILE        - Write G-code to FILE instead of stdout");
    println!("  --settings FILE   - Settings JSON (default ~/.curvereamer/settings.json)");
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options::default();
    let mut drawing = None;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| anyhow!("missing value for {flag}"))
        };
        match arg.as_str() {
            "--path" => {
                let raw = value("--path")?;
                options.path_index = raw
                    .parse::<usize>()
                    .with_context(|| format!("invalid path index '{raw}'"))?;
            }
            "--floor-height" => {
                let raw = value("--floor-height")?;
                let height = raw
                    .parse::<f64>()
                    .with_context(|| format!("invalid floor height '{raw}'"))?;
                options.floor_height = Some(height);
            }
            "--out" => options.out = Some(PathBuf::from(value("--out")?)),
            "--settings" => options.settings = Some(PathBuf::from(value("--settings")?)),
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            path => {
                if drawing.replace(PathBuf::from(path)).is_some() {
                    bail!("only one drawing may be given");
                }
            }
        }
    }

    options.drawing = drawing.ok_or_else(|| anyhow!("no drawing given"))?;
    Ok(options)
}

fn run(options: &Options) -> Result<()> {
    let settings_path = match &options.settings {
        Some(path) => path.clone(),
        None => ReamerSettings::default_settings_path()?,
    };
    let settings = ReamerSettings::load_from_path(&settings_path)?;

    let bytes = fs::read(&options.drawing)
        .with_context(|| format!("read drawing {}", options.drawing.display()))?;
    let mut document = Document::new();
    document
        .load_with_policy(&bytes, settings.area_policy)
        .with_context(|| format!("load drawing {}", options.drawing.display()))?;

    if document.is_empty() {
        bail!("no paths found in {}", options.drawing.display());
    }

    let path = document.path(options.path_index).ok_or_else(|| {
        anyhow!(
            "invalid path index {} (drawing has {} paths)",
            options.path_index,
            document.paths().len()
        )
    })?;

    println!("Paths:  {}", document.paths().len());
    println!("Area:   {}", document.area_label());
    if let Some(length) = document.path_length_label(options.path_index) {
        println!("Length: {length}");
    }
    let floor_height = options.floor_height.unwrap_or(settings.floor_height);
    match document.volume(floor_height, settings.volume_units) {
        Some(volume) => println!(
            "Volume: {} {}",
            fmt3(volume),
            settings.volume_units.suffix()
        ),
        None => println!("Volume: unavailable without physical units"),
    }

    let vertices = vertices_for_path(path);
    let gcode = generate_reaming_gcode(&vertices, &settings.reaming);

    match &options.out {
        Some(out) => {
            fs::write(out, gcode.to_text())
                .with_context(|| format!("write G-code {}", out.display()))?;
            println!("Wrote {} G-code lines to {}", gcode.lines.len(), out.display());
        }
        None => {
            println!("\nG-code:\n");
            for line in &gcode.lines {
                println!("{line}");
            }
        }
    }

    Ok(())
}
