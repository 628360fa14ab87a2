use minesweeper_engine::{
    CellStatus, Difficulty, GameSession, GameState, GameStatus,
    config::Config,
    storage::{FileStore, StorageManager},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

const HELP: &str = "\
commands:
  new <easy|normal|hard|RxCxM> <name>   start a new game
  continue                              resume the saved game
  r <row> <col>                         reveal a cell
  f <row> <col>                         toggle a flag
  debug                                 show or hide mines
  show                                  print the board
  quit                                  save and exit";

fn render(game: &GameState) -> String {
    let mut out = format!(
        "{}  |  mines left {}  |  {}s  |  {}\n",
        game.username(),
        game.mines_left(),
        game.elapsed_seconds(),
        game.status()
    );

    for row in game.cells().chunks(game.cols()) {
        for cell in row {
            let glyph = match cell.status {
                CellStatus::Flagged => 'F',
                CellStatus::Revealed if cell.is_mine => '*',
                CellStatus::Revealed if cell.neighbor_mines == 0 => ' ',
                CellStatus::Revealed => char::from(b'0' + cell.neighbor_mines),
                CellStatus::Hidden if cell.is_mine && game.debug_visible() => 'x',
                CellStatus::Hidden => '#',
            };
            out.push(glyph);
            out.push(' ');
        }
        out.push('\n');
    }

    out
}

fn parse_cell(game: &GameState, row: Option<&str>, col: Option<&str>) -> Option<usize> {
    let row = row?.parse().ok()?;
    let col = col?.parse().ok()?;
    game.board().index_of(row, col)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    let storage = StorageManager::new(FileStore::new(&config.save_dir));
    let session = GameSession::with_tick_period(storage, config.tick_period);

    println!("{HELP}");
    if session.has_saved_game() {
        println!("a saved game exists, type `continue` to resume it");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read input: {}", e);
                break;
            }
        };

        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };

        match command {
            "new" => {
                let difficulty = match words.next().unwrap_or("easy").parse::<Difficulty>() {
                    Ok(difficulty) => difficulty,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                let username = words.next().unwrap_or("player");
                if let Err(e) = session.start_new_game(difficulty, username).await {
                    println!("cannot start game: {e}");
                    continue;
                }
            }
            "continue" => {
                if !session.load_session().await {
                    println!("no saved game");
                    continue;
                }
            }
            "r" | "f" => {
                let Some(game) = session.state().await else {
                    println!("start a game first");
                    continue;
                };
                let Some(index) = parse_cell(&game, words.next(), words.next()) else {
                    println!("usage: {command} <row> <col>");
                    continue;
                };
                if command == "r" {
                    session.on_click(index).await;
                } else {
                    session.on_long_click(index).await;
                }
            }
            "debug" => session.toggle_debug_visibility().await,
            "show" => {}
            "quit" | "exit" => break,
            _ => {
                println!("{HELP}");
                continue;
            }
        }

        if let Some(game) = session.state().await {
            print!("{}", render(&game));
            match game.status() {
                GameStatus::Won => println!("you won in {}s", game.elapsed_seconds()),
                GameStatus::Lost => println!("boom"),
                GameStatus::Playing => {}
            }
        }
    }

    session.suspend().await;
    info!("Bye");
}
