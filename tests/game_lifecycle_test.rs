//! End-to-end games through `TetrisUi` with an in-memory terminal and a
//! hand-driven session.

use std::time::Duration;

use crossterm::event::KeyCode;
use tokio::task::JoinHandle;

use tetris_client::session::{SessionHandle, SessionPeer};
use tetris_client::term::testing::{KeyScript, MemorySurface, ScriptedEvents, SurfaceProbe};
use tetris_client::term::InputMode;
use tetris_client::types::{BoardSnapshot, Color, Geometry, MoveCommand, Pixel};
use tetris_client::ui::{ClientError, GameEnd, GameSummary, TetrisUi};

struct Game {
    task: JoinHandle<Result<GameSummary, ClientError>>,
    probe: SurfaceProbe,
    keys: KeyScript,
    peer: SessionPeer,
}

fn start(player: &str) -> Game {
    let (surface, probe) = MemorySurface::new(40, 32);
    let (events, keys) = ScriptedEvents::new();
    let (session, peer) = SessionHandle::channel(player, 8);
    let ui = TetrisUi::new(surface, events, session, Geometry::default());
    Game {
        task: tokio::spawn(ui.start_game()),
        probe,
        keys,
        peer,
    }
}

async fn wait_for(what: &str, mut cond: impl FnMut() -> bool) {
    let waited = tokio::time::timeout(Duration::from_secs(5), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    assert!(waited.is_ok(), "timed out waiting for {what}");
}

async fn finish(task: JoinHandle<Result<GameSummary, ClientError>>) -> GameSummary {
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("game did not finish")
        .expect("game task panicked")
        .expect("game failed")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn plays_a_game_from_first_key_to_dismissal() {
    let mut g = start("ada");
    wait_for("title", || g.probe.contains("tetris://")).await;
    assert!(g.probe.is_initialized());

    g.keys.press(KeyCode::Left);
    let m = tokio::time::timeout(Duration::from_secs(5), g.peer.moves.recv())
        .await
        .unwrap();
    assert_eq!(m, Some(MoveCommand::MoveLeft));

    g.peer
        .snapshots
        .send(BoardSnapshot {
            pixels: vec![],
            next_piece_pixels: vec![],
            piece_count: 3,
            lines_cleared: 1,
            game_over: false,
        })
        .await
        .unwrap();
    wait_for("first frame", || g.probe.contains("pieces: 3")).await;
    assert!(g.probe.contains("lines: 1"));
    assert!(g.probe.contains("player: ada"));
    assert!(g.probe.contains("next piece:"));

    g.peer.snapshots.send(BoardSnapshot::game_over()).await.unwrap();
    wait_for("game over", || g.probe.contains("GAME OVER, PRESS A KEY")).await;

    // The game waits for the player before tearing down.
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!g.task.is_finished());
    assert!(!g.probe.is_closed());

    g.keys.press(KeyCode::Enter);
    let summary = finish(g.task).await;
    assert_eq!(
        summary,
        GameSummary {
            player_name: "ada".to_string(),
            frames: 1,
            end: GameEnd::GameOver,
            moves_forwarded: Some(1),
        }
    );

    // Initial, frame, game over, final.
    assert_eq!(g.probe.flushes(), 4);
    assert!(g.probe.is_closed());
    assert_eq!(g.probe.input_mode(), Some(InputMode::Esc));
    assert!(g.peer.snapshots.send(BoardSnapshot::default()).await.is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn only_recognised_keys_reach_the_session() {
    let mut g = start("bo");
    let noise = [
        KeyCode::Char('p'),
        KeyCode::Enter,
        KeyCode::F(2),
        KeyCode::Char('m'),
        KeyCode::Tab,
    ];

    g.keys.press(KeyCode::Char(' '));
    for k in noise {
        g.keys.press(k);
    }
    // Every key read and dispatched, next poll armed.
    let expected_polls = 1 + noise.len() + 1;
    wait_for("all keys dispatched", || g.keys.polls() >= expected_polls).await;

    g.peer.snapshots.send(BoardSnapshot::game_over()).await.unwrap();
    wait_for("game over", || g.probe.contains("GAME OVER")).await;
    g.keys.press(KeyCode::Esc);
    let summary = finish(g.task).await;

    assert_eq!(summary.moves_forwarded, Some(1));
    assert_eq!(g.peer.moves.try_recv().ok(), Some(MoveCommand::Drop));
    assert!(g.peer.moves.try_recv().is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn redraws_board_from_each_snapshot() {
    let g = start("cy");
    let geometry = Geometry::default();

    g.peer
        .snapshots
        .send(BoardSnapshot {
            pixels: vec![Pixel::new(0, 0, Color::Red)],
            next_piece_pixels: vec![Pixel::new(1, 1, Color::Green)],
            piece_count: 1,
            ..BoardSnapshot::default()
        })
        .await
        .unwrap();
    wait_for("first frame", || g.probe.contains("pieces: 1")).await;
    assert_eq!(g.probe.cell(2, 10).bg, Color::Red);
    assert_eq!(g.probe.cell(3, 10).bg, Color::Red);
    assert_eq!(g.probe.cell(17, 7).bg, Color::Green);

    // The next frame moves the block; the old cells are cleared.
    g.peer
        .snapshots
        .send(BoardSnapshot {
            pixels: vec![Pixel::new(9, 19, Color::Red)],
            piece_count: 2,
            ..BoardSnapshot::default()
        })
        .await
        .unwrap();
    wait_for("second frame", || g.probe.contains("pieces: 2")).await;
    assert_eq!(g.probe.cell(2, 10).bg, Color::Default);
    assert_eq!(g.probe.cell(17, 7).bg, Color::Default);
    let (x, y) = (geometry.board_origin.x + 18, geometry.board_origin.y + 19);
    assert_eq!(g.probe.cell(x, y).bg, Color::Red);
    assert_eq!(g.probe.cell(x + 1, y).bg, Color::Red);
    // Border untouched.
    assert_eq!(g.probe.cell(0, 0).ch, '╔');
    assert_eq!(g.probe.cell(35, 30).ch, '╝');

    g.peer.snapshots.send(BoardSnapshot::game_over()).await.unwrap();
    wait_for("game over", || g.probe.contains("GAME OVER")).await;
    g.keys.press(KeyCode::Char('q'));
    let summary = finish(g.task).await;
    assert_eq!(summary.frames, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn lost_session_ends_the_game() {
    let g = start("di");
    wait_for("title", || g.probe.contains("tetris://")).await;

    drop(g.peer);
    wait_for("connection lost", || g.probe.contains("CONNECTION LOST, PRESS A KEY")).await;
    g.keys.press(KeyCode::Char('x'));

    let summary = finish(g.task).await;
    assert_eq!(summary.end, GameEnd::SessionClosed);
    assert_eq!(summary.frames, 0);
    assert!(g.probe.is_closed());
}

#[tokio::test]
async fn terminal_init_failure_is_reported_as_system_error() {
    let (surface, probe) = MemorySurface::failing_init(40, 32, "terminal unavailable");
    let (events, _keys) = ScriptedEvents::new();
    let (session, _peer) = SessionHandle::channel("ed", 1);

    let err = TetrisUi::new(surface, events, session, Geometry::default())
        .start_game()
        .await
        .unwrap_err();

    assert!(err.is_system());
    assert!(!probe.is_initialized());
    assert_eq!(probe.flushes(), 0);
}
