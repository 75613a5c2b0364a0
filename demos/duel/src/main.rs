//! Two scripted browsers play tic-tac-toe and rock-paper-scissors through
//! a lobby, the way an HTTP transport would drive it. No network.
//!
//! Run with `RUST_LOG=debug` to see every registry event.

use std::time::Duration;

use parlor::prelude::*;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Fake browser
// ---------------------------------------------------------------------------

/// Holds whatever `Set-Cookie` the lobby sent, like a browser would.
struct Browser {
    name: &'static str,
    cookie: Option<String>,
}

impl Browser {
    fn new(name: &'static str) -> Self {
        Self { name, cookie: None }
    }

    fn request(&mut self, lobby: &Lobby) -> Identity {
        let header = self.cookie.clone();
        let identity = lobby.identify(header.as_deref());
        if let Some(issued) = &identity.issued {
            println!("{} <- Set-Cookie: {}", self.name, issued.to_header_value());
            self.cookie = Some(format!("{}={}", issued.name, issued.token.as_str()));
        }
        identity
    }
}

fn show<T: Serialize>(
    lobby: &Lobby,
    who: &str,
    value: &T,
) -> Result<(), ParlorError> {
    let body = lobby.encode(value)?;
    println!("{who} <- {}", String::from_utf8_lossy(&body));
    Ok(())
}

// ---------------------------------------------------------------------------
// Matches
// ---------------------------------------------------------------------------

async fn tictactoe(
    lobby: &Lobby,
    x: &mut Browser,
    o: &mut Browser,
) -> Result<(), ParlorError> {
    let host = x.request(lobby);
    let ticket = lobby.enter::<TicTacToeBox>(&host, None).await?;
    show(lobby, x.name, &ticket)?;

    let guest = o.request(lobby);
    let joined = lobby.enter::<TicTacToeBox>(&guest, Some(&ticket.room_id)).await?;
    show(lobby, o.name, &joined)?;

    let script = [(0, 1, 1), (1, 0, 0), (0, 2, 0), (1, 0, 1), (0, 0, 2)];
    for (turn, row, col) in script {
        let (name, who) = if turn == 0 { (x.name, &host) } else { (o.name, &guest) };
        let view = lobby
            .play::<TicTacToeBox>(who, &ticket.room_id, Place { row, col })
            .await?;
        show(lobby, name, &view)?;
    }

    // A spectator poll and a late move both get ordinary answers.
    let mut stranger = Browser::new("stranger");
    let who = stranger.request(lobby);
    let view = lobby.room::<TicTacToeBox>(&who, &ticket.room_id).await?;
    show(lobby, stranger.name, &view)?;
    if let Err(err) = lobby
        .play::<TicTacToeBox>(&guest, &ticket.room_id, Place { row: 2, col: 2 })
        .await
    {
        show(lobby, o.name, &err.to_error_body())?;
    }
    Ok(())
}

async fn rps(
    lobby: &Lobby,
    a: &mut Browser,
    b: &mut Browser,
) -> Result<(), ParlorError> {
    let kind = GameKind::RockPaperScissor;
    let p1 = a.request(lobby);
    let room_id = lobby.enter_kind(kind, &p1, None).await?.room_id;
    let p2 = b.request(lobby);
    lobby.enter_kind(kind, &p2, Some(&room_id)).await?;

    let rounds = [
        (r#""rock""#, r#""paper""#),
        (r#""scissors""#, r#""scissors""#),
        (r#""rock""#, r#""paper""#),
    ];
    for (t1, t2) in rounds {
        lobby.play_bytes(kind, &p1, &room_id, t1.as_bytes()).await?;
        let body = lobby.play_bytes(kind, &p2, &room_id, t2.as_bytes()).await?;
        println!("{} <- {}", b.name, String::from_utf8_lossy(&body));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), ParlorError> {
    parlor::init_tracing();

    let lobby = Lobby::builder()
        .room_config(RoomConfig {
            finished_grace: Duration::from_secs(5),
            ..RoomConfig::default()
        })
        .sweep_every(Duration::from_secs(1))
        .build();

    let mut alice = Browser::new("alice");
    let mut bob = Browser::new("bob");

    tictactoe(&lobby, &mut alice, &mut bob).await?;
    rps(&lobby, &mut alice, &mut bob).await?;
    tracing::info!(rooms = lobby.room_counts().await.total(), "matches done");

    tokio::time::sleep(Duration::from_secs(6)).await;
    tracing::info!(
        rooms = lobby.room_counts().await.total(),
        "after finished-game grace"
    );
    Ok(())
}
