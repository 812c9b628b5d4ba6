//! annotate_shell - line-oriented annotation editing session
//!
//! Maps the annotation tool's widget events onto the edit protocol, one
//! command per line, printing the JSON annotation surface after each.
//! Events are handled synchronously, one at a time, exactly like the
//! GUI dispatch the kernel was written for.
//!
//! Commands:
//!   detect PATH           run detection on an image file
//!   select X Y            click at image coordinates
//!   create CLASS          add a centered box with CLASS
//!   delete                delete the selected box
//!   class CLASS           relabel the selected box
//!   coords X1 Y1 X2 Y2    overwrite the selected box's corners
//!   move DIR [STEP]       nudge the selected box (up/down/left/right)
//!   classes               list the backend vocabulary
//!   show                  reprint the current surface
//!   save PATH             write the rendered image as PNG
//!   quit

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, Result};
use clap::Parser;

use labelkit::{
    Annotator, AnnotatorConfig, BackendRegistry, EditOutcome, ImageInput, MoveDirection,
    StubBackend,
};

#[derive(Parser, Debug)]
#[command(name = "annotate_shell", about = "Interactive annotation editing shell")]
struct Args {
    /// Detection backend to use
    #[arg(long, default_value = "stub", env = "LABELKIT_BACKEND")]
    backend: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cfg = AnnotatorConfig::load()?;

    let mut registry = BackendRegistry::new();
    registry.register(StubBackend::new());
    let backend = registry.resolve(Some(&args.backend))?;
    let mut annotator = Annotator::new(backend, &cfg)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut last = annotator.snapshot();

    for line in stdin.lock().lines() {
        let line = line?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, rest)) = tokens.split_first() else {
            continue;
        };

        match dispatch(&mut annotator, command, rest, &last) {
            Ok(Action::Outcome(outcome)) => {
                print_surface(&mut stdout, &outcome)?;
                last = outcome;
            }
            Ok(Action::Quiet) => {}
            Ok(Action::Quit) => break,
            Err(e) => eprintln!("error: {e:#}"),
        }
    }

    Ok(())
}

enum Action {
    Outcome(EditOutcome),
    Quiet,
    Quit,
}

fn dispatch(
    annotator: &mut Annotator,
    command: &str,
    rest: &[&str],
    last: &EditOutcome,
) -> Result<Action> {
    let outcome = match command {
        "detect" => {
            let [path] = rest else {
                return Err(anyhow!("usage: detect PATH"));
            };
            annotator.run_detection(Some(&ImageInput::Path((*path).into())))?
        }
        "select" => {
            let [x, y] = rest else {
                return Err(anyhow!("usage: select X Y"));
            };
            let x: i32 = x.parse().map_err(|_| anyhow!("X must be an integer"))?;
            let y: i32 = y.parse().map_err(|_| anyhow!("Y must be an integer"))?;
            annotator.select_at_point(x, y)
        }
        "create" => {
            let [class_name] = rest else {
                return Err(anyhow!("usage: create CLASS"));
            };
            annotator.create_label(class_name)
        }
        "delete" => annotator.delete_selected(),
        "class" => {
            let [class_name] = rest else {
                return Err(anyhow!("usage: class CLASS"));
            };
            annotator.update_selected_class(class_name)
        }
        "coords" => {
            let [x1, y1, x2, y2] = rest else {
                return Err(anyhow!("usage: coords X1 Y1 X2 Y2"));
            };
            annotator.set_box_coordinates(x1, y1, x2, y2)
        }
        "move" => {
            let (direction, step) = match rest {
                [direction] => (direction.parse::<MoveDirection>()?, None),
                [direction, step] => (
                    direction.parse::<MoveDirection>()?,
                    Some(
                        step.parse::<i32>()
                            .map_err(|_| anyhow!("STEP must be an integer"))?,
                    ),
                ),
                _ => return Err(anyhow!("usage: move DIR [STEP]")),
            };
            annotator.move_selected(direction, step)
        }
        "classes" => {
            println!(
                "{}",
                serde_json::to_string(annotator.session().available_classes())?
            );
            return Ok(Action::Quiet);
        }
        "show" => annotator.snapshot(),
        "save" => {
            let [path] = rest else {
                return Err(anyhow!("usage: save PATH"));
            };
            let image = last
                .image
                .as_ref()
                .ok_or_else(|| anyhow!("nothing rendered yet"))?;
            image.save(path)?;
            log::info!("wrote rendered annotations to {path}");
            return Ok(Action::Quiet);
        }
        "quit" | "exit" => return Ok(Action::Quit),
        other => return Err(anyhow!("unknown command '{}'", other)),
    };
    Ok(Action::Outcome(outcome))
}

fn print_surface(out: &mut impl Write, outcome: &EditOutcome) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string(outcome)?)?;
    out.flush()?;
    Ok(())
}
