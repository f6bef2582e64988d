// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use crate::chart_data::RankWindow;
use crate::config::Config;
use crate::dashboard::{Dashboard, Selection};
use crate::datasets::{DataSource, Dataset};
use crate::report::{self, OutputOptions};
use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::PathBuf;

const HELP: &str = "\
Commands:
  dataset <name>       choose dataset (United-Arab-Emirates, Saudi Arabia, Egypt, Iraq, Morocco)
  upload <path>        use your own CSV file
  clear                go back to the default dataset file
  region <name>        choose region
  range <start> <end>  choose rank range
  show                 redraw with the current choices
  help                 show this message
  quit                 exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dataset(Dataset),
    Upload(PathBuf),
    ClearUpload,
    Region(String),
    Range(usize, usize),
    Show,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Command> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let needs_arg = |what: &str| -> Result<()> {
            if rest.is_empty() {
                anyhow::bail!("'{}' needs {}", word, what);
            }
            Ok(())
        };

        match word.to_lowercase().as_str() {
            "dataset" => {
                needs_arg("a dataset name")?;
                Ok(Command::Dataset(Dataset::parse(rest)?))
            }
            "upload" => {
                needs_arg("a file path")?;
                Ok(Command::Upload(PathBuf::from(rest)))
            }
            "clear" => Ok(Command::ClearUpload),
            "region" => {
                needs_arg("a region name")?;
                Ok(Command::Region(rest.to_string()))
            }
            "range" => {
                let parts: Vec<&str> = rest.split_whitespace().collect();
                let [start, end] = parts.as_slice() else {
                    anyhow::bail!("'range' needs a start and an end, e.g. 'range 0 20'");
                };
                let start = start
                    .parse::<usize>()
                    .map_err(|_| anyhow::anyhow!("Invalid range start: {}", start))?;
                let end = end
                    .parse::<usize>()
                    .map_err(|_| anyhow::anyhow!("Invalid range end: {}", end))?;
                Ok(Command::Range(start, end))
            }
            "show" | "" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => anyhow::bail!("Unknown command '{}'. Type 'help' for a list.", other),
        }
    }
}

/// Control state carried between events. Every change triggers a full recompute.
pub struct Session<'a> {
    config: &'a Config,
    dataset: Dataset,
    upload: Option<PathBuf>,
    region: Option<String>,
    window: RankWindow,
}

impl<'a> Session<'a> {
    pub fn new(config: &'a Config, dataset: Dataset, upload: Option<PathBuf>) -> Self {
        Self {
            config,
            dataset,
            upload,
            region: None,
            window: config.default_window(),
        }
    }

    pub fn selection(&self) -> Result<Selection> {
        Ok(Selection {
            source: DataSource::select(self.dataset, self.upload.clone())?,
            region: self.region.clone(),
            window: self.window,
        })
    }

    /// Apply one control change. Invalid input leaves the state untouched.
    pub fn apply(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Dataset(dataset) => {
                self.dataset = dataset;
                // region choices come from the newly loaded file
                self.region = None;
            }
            Command::Upload(path) => {
                DataSource::select(self.dataset, Some(path.clone()))?;
                self.upload = Some(path);
                self.region = None;
            }
            Command::ClearUpload => {
                self.upload = None;
                self.region = None;
            }
            Command::Region(region) => self.region = Some(region),
            Command::Range(start, end) => {
                self.window = self.config.validate_window(RankWindow::new(start, end))?;
            }
            Command::Show | Command::Help | Command::Quit => {}
        }
        Ok(())
    }

    fn redraw<W: Write>(&mut self, out: &mut W, options: &OutputOptions) -> Result<()> {
        let selection = self.selection()?;
        let view = Dashboard::new(self.config).compute(&selection)?;
        // keep the resolved region so later range changes stay on it
        self.region = Some(view.region.clone());
        let written = report::write_charts(&view, options)?;
        write!(
            out,
            "{}",
            report::format_report(&view, &written, &self.config.attribution, true)
        )?;
        Ok(())
    }

    /// Read commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        out: &mut W,
        options: &OutputOptions,
    ) -> Result<()> {
        writeln!(out, "{}", HELP)?;
        if let Err(e) = self.redraw(out, options) {
            writeln!(out, "Error: {:#}", e)?;
        }

        for line in input.lines() {
            let line = line?;
            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    writeln!(out, "Error: {}", e)?;
                    continue;
                }
            };

            match command {
                Command::Quit => break,
                Command::Help => {
                    writeln!(out, "{}", HELP)?;
                    continue;
                }
                _ => {}
            }

            let previous = (
                self.dataset,
                self.upload.clone(),
                self.region.clone(),
                self.window,
            );
            log::debug!("Input changed: {:?}", command);
            if let Err(e) = self.apply(command).and_then(|_| self.redraw(out, options)) {
                writeln!(out, "Error: {:#}", e)?;
                (self.dataset, self.upload, self.region, self.window) = previous;
            }
        }

        writeln!(out, "Exiting...")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bar_chart::ImageFormat;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_commands() -> Result<()> {
        assert_eq!(Command::parse("dataset Saudi Arabia")?, Command::Dataset(Dataset::SaudiArabia));
        assert_eq!(Command::parse("  DATASET egypt ")?, Command::Dataset(Dataset::Egypt));
        assert_eq!(
            Command::parse("upload my games.csv")?,
            Command::Upload(PathBuf::from("my games.csv"))
        );
        assert_eq!(Command::parse("region Jeux de cartes")?, Command::Region("Jeux de cartes".into()));
        assert_eq!(Command::parse("range 5 25")?, Command::Range(5, 25));
        assert_eq!(Command::parse("clear")?, Command::ClearUpload);
        assert_eq!(Command::parse("")?, Command::Show);
        assert_eq!(Command::parse("q")?, Command::Quit);
        Ok(())
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Command::parse("dataset").is_err());
        assert!(Command::parse("dataset Atlantis").is_err());
        assert!(Command::parse("range 5").is_err());
        assert!(Command::parse("range a b").is_err());
        assert!(Command::parse("zoom in").is_err());
    }

    #[test]
    fn test_apply_updates_state() -> Result<()> {
        let config = Config::default();
        let mut session = Session::new(&config, Dataset::default(), None);

        session.apply(Command::Region("Games".into()))?;
        session.apply(Command::Range(10, 30))?;
        let selection = session.selection()?;
        assert_eq!(selection.region.as_deref(), Some("Games"));
        assert_eq!(selection.window, RankWindow::new(10, 30));

        // switching dataset resets the region
        session.apply(Command::Dataset(Dataset::Morocco))?;
        let selection = session.selection()?;
        assert_eq!(selection.source, DataSource::Default(Dataset::Morocco));
        assert_eq!(selection.region, None);
        Ok(())
    }

    #[test]
    fn test_invalid_range_keeps_state() {
        let config = Config::default();
        let mut session = Session::new(&config, Dataset::default(), None);
        assert!(session.apply(Command::Range(10, 80)).is_err());
        assert!(session.apply(Command::Upload(PathBuf::from("games.txt"))).is_err());

        let selection = session.selection().unwrap();
        assert_eq!(selection.window, RankWindow::new(0, 20));
        assert_eq!(selection.source, DataSource::Default(Dataset::UnitedArabEmirates));
    }

    #[test]
    fn test_run_recomputes_on_change() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("extracted_uae.csv"),
            "Rank,Title,Type,Region\n\
             1,Ludo King,Top Free,Games\n\
             1,Roblox,Top Free,Kids\n",
        )?;
        // a window past every partition keeps each page to notices only
        let config = Config {
            data_dir: dir.path().to_path_buf(),
            default_start: 30,
            default_end: 40,
            ..Config::default()
        };
        let options = OutputOptions {
            output_dir: dir.path().join("out"),
            format: ImageFormat::Svg,
            size: (800, 600),
            json: false,
        };

        let input = "range 35 45\nregion Kids\nregion Nowhere\nbogus\nquit\n";
        let mut out = Vec::new();
        let mut session = Session::new(&config, Dataset::default(), None);
        session.run(input.as_bytes(), &mut out, &options)?;

        let out = String::from_utf8(out)?;
        assert!(out.contains("Top Ranked Games by Category in Games"));
        assert!(out.contains("No data available for Top Free Games."));
        assert!(out.contains("Top Ranked Games by Category in Kids"));
        assert!(out.contains("Region 'Nowhere' not found"));
        assert!(out.contains("Error: Unknown command 'bogus'"));
        assert!(out.ends_with("Exiting...\n"));

        let selection = session.selection()?;
        assert_eq!(selection.region.as_deref(), Some("Kids"));
        assert_eq!(selection.window, RankWindow::new(35, 45));
        Ok(())
    }
}
