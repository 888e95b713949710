use crate::kiosk::StudyRoom;
use crate::kiosk::board::Board;
use crate::kiosk::snapshot::Snapshot;
use crate::utils::format::{format_error_message, format_event_message, format_info_message};
use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

/// Check a student in or out by code
pub async fn check(room: &StudyRoom, code: &str) -> String {
    match room.check(code, room.now()).await {
        Ok(toggle) => format_event_message(&toggle.record, &toggle.event),
        Err(e) => format_error_message(&e.to_string()),
    }
}

/// Kiosk loop: redraw the board on every tick and toggle codes typed on stdin.
pub async fn kiosk(room: &StudyRoom) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(room.config.refresh_interval);
    let mut snapshot: Option<Snapshot> = None;
    let mut last_message: Option<String> = None;

    tracing::info!(
        "Kiosk started, refreshing every {:?}",
        room.config.refresh_interval
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = room.now();
                let next = room.refresh(snapshot.take(), now).await;
                let board = Board::build(&next, now, room.config.leaderboard_size);

                print!("{}{}", CLEAR_SCREEN, board.render());
                if let Some(message) = &last_message {
                    println!("\n{}", message);
                }
                println!("\nEnter your code:");

                snapshot = Some(next);
            }
            line = lines.next_line() => {
                match line? {
                    Some(code) if code.trim().is_empty() => {}
                    Some(code) => {
                        let message = check(room, &code).await;
                        println!("{}", message);
                        last_message = Some(message);
                        ticker.reset_immediately();
                    }
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    println!("{}", format_info_message("Kiosk stopped"));
    tracing::info!("Kiosk stopped");
    Ok(())
}
