use anyhow::Result;
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};

use connect4_gametree::{Board, Cell, GameState, Player, COLUMNS, ROWS};

/// Draws the board top row first, with one-indexed column labels above it
pub fn display(board: &Board) -> Result<()> {
    let mut stdout = stdout();

    let cols: String = (1..=COLUMNS).map(|x| x.to_string()).collect();
    stdout.queue(PrintStyledContent(style(cols + "\n")))?;

    for row in 0..ROWS {
        for column in 0..COLUMNS {
            stdout.queue(PrintStyledContent(
                style("O")
                    .attribute(Attribute::Bold)
                    .on(Color::DarkBlue)
                    .with(match board.get(row, column) {
                        Cell::PlayerOne => Color::Red,
                        Cell::PlayerTwo => Color::Yellow,
                        Cell::Empty => Color::DarkBlue,
                    }),
            ))?;
        }
        stdout.queue(PrintStyledContent(style("\n")))?;
    }
    stdout.flush()?;
    Ok(())
}

/// A short label for `player`, marking which side the agent plays
pub fn player_name(player: Player, agent: Player) -> String {
    let number = match player {
        Player::One => 1,
        Player::Two => 2,
    };
    if player == agent {
        format!("Player {} (agent)", number)
    } else {
        format!("Player {}", number)
    }
}

/// The closing message for a finished game, if it is finished
pub fn outcome(state: GameState, agent: Player) -> Option<String> {
    match state {
        GameState::Playing => None,
        GameState::PlayerOneWin => Some(format!("{} wins!", player_name(Player::One, agent))),
        GameState::PlayerTwoWin => Some(format!("{} wins!", player_name(Player::Two, agent))),
        GameState::Draw => Some("Draw!".to_string()),
    }
}
