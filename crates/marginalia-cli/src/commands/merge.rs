use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;

use marginalia_core::backup::Backup;
use marginalia_core::merge::{
    merge_snapshots, ConflictResolver, Conflicts, MergeSolution, PreferSide, Side, Solutions,
};
use marginalia_core::models::Snapshot;
use tracing::info;

use crate::cli::PreferredSide;
use crate::error::CliError;

pub fn run_merge(
    left: &Path,
    right: &Path,
    dest: &Path,
    prefer: Option<PreferredSide>,
    device_name: &str,
) -> Result<(), CliError> {
    if dest.exists() {
        return Err(CliError::DestinationExists(dest.to_path_buf()));
    }

    info!("importing left backup");
    let left = Backup::open(left)?;
    info!("importing right backup");
    let right = Backup::open(right)?;

    let merged = if let Some(prefer) = prefer {
        let side = match prefer {
            PreferredSide::Left => Side::Left,
            PreferredSide::Right => Side::Right,
        };
        merge_snapshots(&left.snapshot, &right.snapshot, &mut PreferSide(side))?
    } else {
        let mut resolver = InteractiveResolver::default();
        match merge_snapshots(&left.snapshot, &right.snapshot, &mut resolver) {
            Ok(merged) => merged,
            // The resolver remembers why it gave up; prefer that over the
            // wrapped I/O error it had to hand the engine.
            Err(error) => {
                return Err(resolver
                    .failure
                    .take()
                    .unwrap_or(CliError::Core(error)))
            }
        }
    };

    info!("exporting merged backup");
    Backup::write(&merged, dest, device_name)?;
    println!("Merged backup written to {}", dest.display());
    Ok(())
}

/// Asks on the terminal, one conflict at a time, which side to keep.
///
/// On a terminal, unintelligible answers just reprompt. In piped input
/// they abort instead: a malformed answer stream would otherwise loop
/// forever. The precise reason is stashed in `failure` because the
/// resolver trait can only hand the engine a core error.
#[derive(Default)]
struct InteractiveResolver {
    failure: Option<CliError>,
}

impl ConflictResolver for InteractiveResolver {
    fn resolve(
        &mut self,
        table: &'static str,
        conflicts: &Conflicts,
        context: &Snapshot,
    ) -> marginalia_core::Result<Solutions> {
        let interactive = io::stdin().is_terminal();
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        let mut solutions = Solutions::new();

        for (key, conflict) in conflicts {
            println!("\nConflict in {table}:");
            println!("--- left ---------------------------------------------------------");
            println!("{}", conflict.left.pretty_print(context));
            println!("--- right --------------------------------------------------------");
            println!("{}", conflict.right.pretty_print(context));

            let side = loop {
                print!("Keep which side? [l]eft / [r]ight: ");
                io::stdout().flush()?;
                let Some(line) = lines.next() else {
                    self.failure = Some(CliError::ResolutionAborted);
                    return Err(resolution_failed(
                        io::ErrorKind::UnexpectedEof,
                        "conflict prompt closed before all conflicts were answered",
                    ));
                };
                let answer = line?;
                match parse_answer(&answer) {
                    Some(side) => break side,
                    None if interactive => println!("Please answer 'l' or 'r'."),
                    None => {
                        self.failure = Some(CliError::InvalidAnswer {
                            answer: answer.trim().to_string(),
                        });
                        return Err(resolution_failed(
                            io::ErrorKind::InvalidData,
                            "unrecognized conflict answer in piped input",
                        ));
                    }
                }
            };

            solutions.insert(key.clone(), MergeSolution::keep(side, conflict));
        }

        Ok(solutions)
    }
}

fn resolution_failed(kind: io::ErrorKind, message: &str) -> marginalia_core::Error {
    marginalia_core::Error::Io(io::Error::new(kind, message.to_string()))
}

/// Map a typed answer onto a side, `None` for anything unintelligible.
pub(crate) fn parse_answer(answer: &str) -> Option<Side> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "l" | "left" => Some(Side::Left),
        "r" | "right" => Some(Side::Right),
        _ => None,
    }
}
