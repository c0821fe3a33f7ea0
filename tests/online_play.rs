use sparring_chess::errors::ChessError;
use sparring_chess::game_state::chess_types::{Cell, Color};
use sparring_chess::move_generation::terminal::GameStatus;
use sparring_chess::session::display::{DisplayEvent, RecordingDisplay};
use sparring_chess::session::game_record::SessionContext;
use sparring_chess::session::game_session::{GameSession, SessionPhase};
use sparring_chess::session::player::{GameMode, PlayerKind};
use sparring_chess::session::session_config::SessionConfig;
use sparring_chess::session::transport::{
    NetworkRole, RecordingTransport, RemoteMoveDescriptor, RemoteMoveKind, TransportCall,
};
use sparring_chess::utils::algebraic::algebraic_to_cell;

fn cell(name: &str) -> Cell {
    algebraic_to_cell(name).expect("valid square")
}

fn descriptor(from: &str, to: &str, kind: RemoteMoveKind) -> RemoteMoveDescriptor {
    RemoteMoveDescriptor {
        from: cell(from),
        to: cell(to),
        kind,
    }
}

fn online(role: NetworkRole) -> (GameSession, RecordingTransport, RecordingDisplay) {
    let transport = RecordingTransport::new();
    let display = RecordingDisplay::new();
    let session = GameSession::new(
        SessionConfig {
            mode: GameMode::OnlineMultiplayer,
            network_role: Some(role),
            ..SessionConfig::default()
        },
        Box::new(display.clone()),
        Some(Box::new(transport.clone())),
        &mut SessionContext::new(),
    )
    .expect("session builds");
    (session, transport, display)
}

fn awaiting_count(transport: &RecordingTransport) -> usize {
    transport
        .calls()
        .iter()
        .filter(|call| matches!(call, TransportCall::Awaiting(_)))
        .count()
}

#[test]
fn host_sends_and_listens_once_per_turn() {
    let (mut session, transport, _) = online(NetworkRole::Host);
    assert_eq!(session.player(Color::Light).kind(), PlayerKind::Human);
    assert_eq!(session.player(Color::Dark).kind(), PlayerKind::Remote);

    session.start().expect("start");
    assert!(transport.calls().is_empty());

    let e4 = session.submit_san("e4").expect("host move");
    assert_eq!(
        transport.calls(),
        vec![
            TransportCall::Sent(RemoteMoveDescriptor::from_move(&e4)),
            TransportCall::Awaiting(Color::Dark),
        ]
    );

    session
        .submit_remote_move(&descriptor("e7", "e5", RemoteMoveKind::DoubleAdvance))
        .expect("peer move resolves");
    assert_eq!(session.phase(), SessionPhase::AwaitingMove(Color::Light));
    assert_eq!(awaiting_count(&transport), 1);
    assert_eq!(session.san_history().expect("history"), vec!["e4", "e5"]);
}

#[test]
fn client_listens_as_soon_as_play_starts() {
    let (mut session, transport, _) = online(NetworkRole::Client);
    session.start().expect("start");
    assert_eq!(transport.calls(), vec![TransportCall::Awaiting(Color::Light)]);
    assert!(matches!(
        session.submit_san("e4"),
        Err(ChessError::NotYourTurn(_))
    ));

    session
        .submit_remote_move(&descriptor("g1", "f3", RemoteMoveKind::Simple))
        .expect("peer move resolves");
    assert_eq!(session.phase(), SessionPhase::AwaitingMove(Color::Dark));
    session.submit_san("Nf6").expect("client move");
    assert_eq!(awaiting_count(&transport), 2);
}

#[test]
fn unresolvable_remote_moves_change_nothing() {
    let (mut session, transport, _) = online(NetworkRole::Client);
    session.start().expect("start");
    let before = session.fen().expect("fen");

    let bogus = descriptor("e2", "e5", RemoteMoveKind::Simple);
    assert!(matches!(
        session.submit_remote_move(&bogus),
        Err(ChessError::UnresolvableRemoteMove(_))
    ));
    assert_eq!(session.fen().expect("fen"), before);
    assert_eq!(session.phase(), SessionPhase::AwaitingMove(Color::Light));
    assert!(transport
        .calls()
        .contains(&TransportCall::Unresolvable(bogus)));
}

#[test]
fn stale_origin_is_resolved_by_destination() {
    let (mut session, _, _) = online(NetworkRole::Client);
    session.start().expect("start");
    let mv = session
        .submit_remote_move(&descriptor("h3", "e4", RemoteMoveKind::DoubleAdvance))
        .expect("falls back to the e-pawn");
    assert_eq!(mv.from, cell("e2"));
}

#[test]
fn lost_peer_ends_the_game_without_a_winner() {
    let (mut session, transport, display) = online(NetworkRole::Host);
    session.start().expect("start");
    transport.disconnect();

    session.submit_san("d4").expect("local commit still succeeds");
    assert_eq!(
        session.phase(),
        SessionPhase::GameEnded(GameStatus::Disconnected)
    );
    assert_eq!(session.record().result, "*");
    assert!(display.events().contains(&DisplayEvent::GameEnded {
        status: GameStatus::Disconnected,
        winner: None
    }));
    assert!(session
        .submit_remote_move(&descriptor("d7", "d5", RemoteMoveKind::DoubleAdvance))
        .is_err());
}

#[test]
fn history_browsing_is_disabled_online() {
    let (mut session, _, _) = online(NetworkRole::Host);
    session.start().expect("start");
    assert!(matches!(session.pause(), Err(ChessError::InvalidPhase(_))));
}

#[test]
fn resignation_by_the_remote_side() {
    let (mut session, _, _) = online(NetworkRole::Host);
    session.start().expect("start");
    session.resign(Color::Dark).expect("resign");
    assert_eq!(
        session.phase(),
        SessionPhase::GameEnded(GameStatus::Resigned {
            winner: Color::Light
        })
    );
    assert_eq!(session.record().result, "1-0");
}
