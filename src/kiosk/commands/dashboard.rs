use crate::kiosk::StudyRoom;
use crate::kiosk::board::Board;
use anyhow::Result;

/// Print the current leaderboards once
pub async fn board(room: &StudyRoom, json: bool) -> Result<String> {
    let now = room.now();
    let snapshot = room.refresh(None, now).await;
    let board = Board::build(&snapshot, now, room.config.leaderboard_size);

    if json {
        Ok(serde_json::to_string_pretty(&board)?)
    } else {
        Ok(board.render())
    }
}
