use crate::Command;
use crate::advisory::{active_closures, is_unreadable};
use crate::config::ExerciseConfig;
use crate::decision::{DecisionEvent, DecisionLog, NoteLevel, Outcome};
use crate::error::{ApplicationError, ApplicationResult};
use crate::flight::{SortKey, sort_flight_plans};
use crate::queue::{OperationKind, QueueStore};
use crate::records::{
    Records, load_bulletins, load_fleet, load_flight_plans, load_pilots, load_runways,
};
use crate::report::ShiftReport;
use crate::runway::RunwayStatus;
use crate::time::wall_clock;
use crate::tower::engine::{Reference, Tower};
use colored::Colorize;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::{Command as Process, Stdio};
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};
use tracing::{error, warn};

const PAGE_ROWS: usize = 20;

/// Runs operator commands against the files of one exercise.
pub(crate) struct Station {
    config: ExerciseConfig,
    log: DecisionLog,
    queues: QueueStore,
}

#[derive(Tabled)]
struct RunwayRow {
    #[tabled(rename = "Runway")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "NOTAM")]
    notam: String,
}

impl Station {
    pub fn new(config: ExerciseConfig) -> Self {
        let log = DecisionLog::new(config.decision_log());
        let queues = QueueStore::new(config.queue_dir());
        Station {
            config,
            log,
            queues,
        }
    }

    fn reference(&self) -> Reference {
        Reference {
            date: self.config.reference_date,
            instant: self.config.reference_time,
        }
    }

    /// Runs one command. Only `import-data` reports failure through the return
    /// value; every other failure is printed and noted in the log.
    pub fn run(&mut self, command: &Command) -> bool {
        let result = match command {
            Command::List { by } => self.list(*by),
            Command::ImportData => return self.import_data(),
            Command::Enqueue { kind, flight } => self.enqueue(*kind, flight),
            Command::Authorize { kind, runway } => self.authorize(*kind, runway),
            Command::Status => self.status(),
            Command::Report => self.report(),
            Command::Reset => self.reset(),
            Command::Console => {
                println!("Already in the console.");
                Ok(())
            }
        };
        if let Err(e) = result {
            error!(error = %e, "Command aborted");
            println!("{} {e}", "ERROR:".red().bold());
            self.note(NoteLevel::Error, format!("ERROR: {e}"));
        }
        true
    }

    fn note(&self, level: NoteLevel, message: String) {
        if let Err(e) = self.log.note(level, message) {
            warn!(error = %e, "Could not write to the decision log");
        }
    }

    fn list(&self, by: SortKey) -> ApplicationResult<()> {
        let mut flights = load_flight_plans(&self.config.flight_plans())?;
        if flights.is_empty() {
            println!("No flight plans to display.");
            return Ok(());
        }
        sort_flight_plans(&mut flights, by);
        let mut table = Table::new(&flights);
        table.with(Style::rounded());
        table.with(Alignment::left());
        show(table.to_string(), flights.len());
        Ok(())
    }

    fn import_data(&mut self) -> bool {
        println!("--- CHECKING DATA FILES ---");
        let missing = self
            .config
            .required_sources()
            .into_iter()
            .filter(|p| !p.exists())
            .collect::<Vec<PathBuf>>();
        for path in &missing {
            let message = format!("CHECK FAILED: data file not found: {}", path.display());
            println!("{}", message.red());
            self.note(NoteLevel::Error, message);
        }
        if !missing.is_empty() {
            return false;
        }

        match self.validate_sources() {
            Ok(summary) => {
                let message = format!("SUCCESS: all required data files found ({summary}).");
                println!("{}", message.green());
                self.note(NoteLevel::Info, message);
                true
            }
            Err(e) => {
                let message = format!("CHECK FAILED: {e}");
                println!("{}", message.red());
                self.note(NoteLevel::Error, message);
                false
            }
        }
    }

    fn validate_sources(&self) -> ApplicationResult<String> {
        let flights = load_flight_plans(&self.config.flight_plans())?.len();
        let runways = load_runways(&self.config.runways())?.len();
        let fleet = load_fleet(&self.config.fleet())?.len();
        let pilots = load_pilots(&self.config.pilots())?.len();
        let metar = load_bulletins(&self.config.metar())?.len();
        let notam = load_bulletins(&self.config.notam())?.len();
        Ok(format!(
            "{flights} flight plans, {runways} runways, {fleet} aircraft, {pilots} pilots, \
             {metar} METAR, {notam} NOTAM"
        ))
    }

    fn enqueue(&mut self, kind: OperationKind, flight: &str) -> ApplicationResult<()> {
        let records = Records {
            flights: load_flight_plans(&self.config.flight_plans())?,
            pilots: load_pilots(&self.config.pilots())?,
            ..Records::default()
        };
        let mut queue = self.queues.open(kind)?;
        let event = Tower::new(&records, self.reference()).enqueue(&mut queue, flight, &mut self.log)?;
        print_decision(&event);
        Ok(())
    }

    fn authorize(&mut self, kind: OperationKind, runway: &str) -> ApplicationResult<()> {
        let records = Records {
            runways: load_runways(&self.config.runways())?,
            notams: load_bulletins(&self.config.notam())?,
            ..Records::default()
        };
        let mut queue = self.queues.open(kind)?;
        let event =
            Tower::new(&records, self.reference()).authorize(&mut queue, runway, &mut self.log)?;
        print_decision(&event);
        Ok(())
    }

    fn status(&self) -> ApplicationResult<()> {
        let reference = self.reference();
        println!(
            "--- TOWER STATUS --- (exercise {} {})",
            reference.date, reference.instant
        );

        let notams = optional(load_bulletins(&self.config.notam()))?;
        let active = notams
            .as_deref()
            .map(|n| active_closures(n, reference.instant))
            .unwrap_or_default();

        println!("\n[ RUNWAYS ]");
        match optional(load_runways(&self.config.runways()))? {
            Some(runways) if !runways.is_empty() => {
                let rows = runways.iter().map(|r| RunwayRow {
                    name: r.name.to_string(),
                    status: match &r.status {
                        RunwayStatus::Open => r.status.to_string().green().to_string(),
                        RunwayStatus::Closed => r.status.to_string().red().to_string(),
                        RunwayStatus::Other(_) => r.status.to_string().yellow().to_string(),
                    },
                    notam: active
                        .iter()
                        .filter(|c| c.runway == &*r.name)
                        .map(|c| format!("CLOSED {}", c.window))
                        .collect::<Vec<_>>()
                        .join(", "),
                });
                let mut table = Table::new(rows);
                table.with(Style::rounded());
                table.with(Alignment::left());
                println!("{table}");
            }
            _ => println!("No runway information available."),
        }

        println!("\n[ OPERATION QUEUES ]");
        for kind in [OperationKind::Landing, OperationKind::Takeoff] {
            let queue = self.queues.snapshot(kind)?;
            println!("- Flights in the {kind} queue: {}", queue.len());
            if !queue.is_empty() {
                println!("  Next: {}", queue.preview(3).join(", "));
            }
        }

        println!("\n[ ACTIVE ADVISORIES ]");
        println!("- METAR (weather):");
        match optional(load_bulletins(&self.config.metar()))?.and_then(|m| m.last().cloned()) {
            Some(latest) => println!("  {latest}"),
            None => println!("  No recent METAR bulletin."),
        }
        println!("- NOTAM (notices):");
        match notams.as_deref().filter(|n| !n.is_empty()) {
            Some(notams) => {
                for notice in notams {
                    let mut markers = vec![];
                    if active.iter().any(|c| c.notice == notice) {
                        markers.push(format!("[ACTIVE {}]", reference.instant).red().to_string());
                    }
                    if is_unreadable(notice) {
                        markers.push("[UNREADABLE]".yellow().to_string());
                    }
                    println!("  {}", notice_line(notice, &markers));
                }
            }
            None => println!("  No active NOTAM."),
        }
        Ok(())
    }

    fn report(&mut self) -> ApplicationResult<()> {
        println!("--- GENERATING OPERATION REPORT ---");
        let contents = match self.log.read() {
            Err(ApplicationError::MissingSource(_)) => {
                println!("Decision log not found. No operations to report.");
                return Ok(());
            }
            contents => contents?,
        };
        let now = wall_clock();
        let report = ShiftReport::from_log(&contents, now);
        let path = self.config.report_file(now.date());
        report.write_to(&path)?;
        print!("{report}");

        let message = format!("SUCCESS: report written to '{}'", path.display());
        println!("{}", message.green());
        self.note(NoteLevel::Info, message);
        Ok(())
    }

    fn reset(&mut self) -> ApplicationResult<()> {
        println!("--- CLEARING GENERATED FILES ---");
        self.log.clear()?;
        println!("- Cleared '{}'.", self.log.path().display());
        for kind in OperationKind::ALL {
            let path = self.queues.clear(kind)?;
            println!("- Cleared '{}'.", path.display());
        }

        let dir = &self.config.report_dir;
        let reports = match fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .map(|e| e.path())
                .filter(|p| ExerciseConfig::is_report_file(p))
                .collect::<Vec<_>>(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => vec![],
            Err(e) => return Err(ApplicationError::on_path(dir, e)),
        };
        if reports.is_empty() {
            println!("- No old reports to remove.");
        }
        for report in reports {
            fs::remove_file(&report).map_err(|e| ApplicationError::on_path(&report, e))?;
            println!("- Removed report '{}'.", report.display());
        }
        println!("\nReset complete.");
        Ok(())
    }
}

/// A source the command can do without: missing reads as `None`.
fn optional<T>(result: ApplicationResult<T>) -> ApplicationResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ApplicationError::MissingSource(path)) => {
            warn!(path = %path.display(), "Data source missing");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn notice_line(notice: &str, markers: &[String]) -> String {
    std::iter::once(notice.to_string())
        .chain(markers.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_decision(event: &DecisionEvent) {
    let line = event.to_string();
    match event.outcome {
        Outcome::Authorized | Outcome::EnqueueSucceeded => println!("{}", line.green()),
        Outcome::Denied | Outcome::EnqueueFailed => println!("{}", line.red()),
    }
}

fn show(content: String, rows: usize) {
    if rows > PAGE_ROWS && io::stdout().is_terminal() {
        if let Err(e) = paginate(&content) {
            warn!(error = %e, "Pager unavailable");
            println!("{content}");
        }
    } else {
        println!("{content}");
    }
}

fn paginate(content: &str) -> io::Result<()> {
    let mut pager = Process::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Process::new("more").stdin(Stdio::piped()).spawn())?;

    if let Some(mut stdin) = pager.stdin.take() {
        if let Err(e) = stdin.write_all(content.as_bytes()) {
            // Broken pipe is common if the user quits the pager early
            if e.kind() != io::ErrorKind::BrokenPipe {
                return Err(e);
            }
        }
    }

    pager.wait().map(|_| ())
}
