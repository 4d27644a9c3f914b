pub mod command;
pub mod render;

use std::io::Write;

use futures::StreamExt;
use tokio::sync::mpsc;

use crate::{
    pipeline::{PipelineError, Source},
    reminder::Reminder,
    session::Session,
};

pub use command::{Command, CommandError, Role};

fn write_lines<W: Write>(out: &mut W, lines: &[String]) -> Result<(), PipelineError> {
    for line in lines {
        writeln!(out, "{line}").map_err(|e| PipelineError::Output(e.to_string()))?;
    }
    out.flush().map_err(|e| PipelineError::Output(e.to_string()))
}

/// Drive `session` from `source` until the input ends or the user quits.
///
/// Reminders arriving on `reminders` are printed between commands while
/// they still apply to the open customer view.
pub async fn run<S, W>(
    session: &mut Session,
    source: &S,
    reminders: &mut mpsc::Receiver<Reminder>,
    out: &mut W,
) -> Result<(), PipelineError>
where
    S: Source<String>,
    W: Write,
{
    write_lines(out, &session.greeting())?;
    let mut input = source.stream().await;

    loop {
        tokio::select! {
            item = input.next() => match item {
                Some(Ok(env)) => {
                    let now = session.clock().now();
                    let reply = session.handle_line(&env.payload, now).await;
                    write_lines(out, &reply.lines)?;
                    if reply.quit {
                        break;
                    }
                }
                Some(Err(e)) => {
                    tracing::error!(error = %e, "console input failed");
                    session.shutdown();
                    return Err(e);
                }
                None => break,
            },
            Some(reminder) = reminders.recv() => {
                if let Some(text) = session.deliver(&reminder).await {
                    write_lines(out, &[format!("[reminder] {text}")])?;
                }
            }
        }
    }

    session.shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::Clock, sources::ArgsSource};
    use electromonitor_core::{domain::CustomerDirectory, LatePaymentPolicy, Tariff};
    use std::time::Duration;

    #[tokio::test]
    async fn scripted_session_prints_views() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut session = Session::from_parts(
            CustomerDirectory::seeded(),
            Tariff::default(),
            LatePaymentPolicy::default(),
            Duration::from_millis(7000),
            Clock::utc(),
            tx,
        );
        let source = ArgsSource::new([
            "role officer",
            "usage c1 250 CHIPX",
            "usage c2 85 CHIPY",
            "switch",
            "role customer",
            "select c2",
            "quit",
            "table",
        ]);
        let mut out = Vec::new();

        run(&mut session, &source, &mut rx, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Welcome to ElectroMonitor"));
        assert!(text.contains("Payable Amount is ₹1050."));
        assert!(text.contains("Payable Amount is ₹255."));
        assert!(text.contains("Welcome, Sneha Bhat!"));
        assert!(text.contains("Latest Usage: 85 kWh"));
        assert!(text.trim_end().ends_with("Goodbye."));
        assert!(session.reminding().is_none());
    }
}
