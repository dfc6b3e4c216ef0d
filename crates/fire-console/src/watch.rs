//! The `watch` subcommand: the live alert banner.

use std::error::Error;
use std::io::BufRead;

use alert_banner::{AlertPipeline, BannerConfig, BannerHandle, ConsolePresenter};
use alert_stream::AlertClient;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;

pub async fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    let client = AlertClient::connect(config.stream_config()).await?;
    let events = alert_stream::subscribe(&client).await?;

    let presenter = ConsolePresenter::stdout(config.display_offset);
    let (pipeline, handle) =
        AlertPipeline::new(presenter, BannerConfig::with_display_window(config.display_window));

    let acknowledger = tokio::spawn(acknowledge_lines(stdin_lines(), handle));

    info!(server = %config.server_url, "Watching for fire alerts, press Ctrl+C to stop");
    let summary = pipeline.run_until_stopped(events).await;

    // The pipeline dropped its status channel, which ends the acknowledger
    let _ = acknowledger.await;
    info!(
        displayed = summary.displayed,
        dropped = summary.dropped,
        "Alert console stopped"
    );

    Ok(())
}

/// Forward stdin lines from a plain thread.
///
/// A read blocked on the terminal cannot be cancelled, so it must not live
/// on the runtime. The thread ends with the process.
fn stdin_lines() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();

    let spawned = std::thread::Builder::new()
        .name("stdin-acks".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
    if let Err(e) = spawned {
        warn!("Failed to start stdin reader, alerts will clear by timeout only: {}", e);
    }

    rx
}

/// Each line acknowledges the alert on screen.
///
/// Ends when the lines run out or the pipeline stops.
async fn acknowledge_lines(mut lines: mpsc::UnboundedReceiver<String>, handle: BannerHandle) {
    let mut status = handle.subscribe();

    loop {
        tokio::select! {
            line = lines.recv() => match line {
                Some(_) => match handle.acknowledge_current() {
                    Ok(Some(id)) => debug!("Acknowledged {}", id),
                    Ok(None) => debug!("Nothing on screen to acknowledge"),
                    Err(_) => break,
                },
                None => {
                    debug!("stdin closed, alerts will clear by timeout only");
                    break;
                }
            },
            changed = status.changed() => {
                if changed.is_err() {
                    debug!("Alert pipeline stopped");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use alert_banner::{Dismissal, PresenterCall, RecordingPresenter};
    use alert_stream::{Alert, Building, ChannelEvent};
    use chrono::DateTime;
    use futures::StreamExt;
    use tokio::sync::oneshot;

    use super::*;

    fn alert() -> Alert {
        let ts = DateTime::parse_from_rfc3339("2025-08-06T14:00:00+03:00").unwrap();
        Alert::new(Building::A, 1, ts).unwrap()
    }

    #[tokio::test]
    async fn test_acknowledger_stops_with_pipeline() {
        let (pipeline, handle) = AlertPipeline::new(RecordingPresenter::new(), BannerConfig::default());
        let (line_tx, line_rx) = mpsc::unbounded_channel();
        let acknowledger = tokio::spawn(acknowledge_lines(line_rx, handle));

        // Shut down at once, with stdin still open
        pipeline
            .run_with_shutdown(futures::stream::pending::<ChannelEvent>(), async {})
            .await;

        tokio::time::timeout(Duration::from_secs(1), acknowledger)
            .await
            .expect("acknowledger outlived the pipeline")
            .unwrap();
        drop(line_tx);
    }

    #[tokio::test]
    async fn test_line_acknowledges_current_alert() {
        let presenter = RecordingPresenter::new();
        let (pipeline, handle) = AlertPipeline::new(presenter.clone(), BannerConfig::default());
        let mut status = handle.subscribe();

        let (line_tx, line_rx) = mpsc::unbounded_channel();
        let acknowledger = tokio::spawn(acknowledge_lines(line_rx, handle));

        let events = futures::stream::iter(vec![ChannelEvent::Alert(alert())])
            .chain(futures::stream::pending());
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let run = tokio::spawn(pipeline.run_with_shutdown(events, async move {
            let _ = stop_rx.await;
        }));

        status.wait_for(|s| s.current.is_some()).await.unwrap();
        line_tx.send(String::new()).unwrap();
        status.wait_for(|s| s.current.is_none()).await.unwrap();

        stop_tx.send(()).unwrap();
        let summary = run.await.unwrap();
        assert_eq!(summary.displayed, 1);
        assert_eq!(summary.dropped, 0);

        tokio::time::timeout(Duration::from_secs(1), acknowledger)
            .await
            .expect("acknowledger outlived the pipeline")
            .unwrap();

        assert!(matches!(
            presenter.calls().last(),
            Some(PresenterCall::Clear {
                dismissal: Dismissal::Acknowledged,
                ..
            })
        ));
    }
}
