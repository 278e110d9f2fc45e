use std::time::Duration;

use broadside::transport::in_memory::InMemoryTransport;
use broadside::transport::Transport;
use broadside::{
    random_fleet, Board, BotGunner, Coord, MatchOutcome, MatchSession, Orientation, PeerMessage,
    PeerNode, Role, SessionState, Ship, ShipClass, Winner,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn coord(x: u8, y: u8) -> Coord {
    Coord::new(x, y).unwrap()
}

fn session(role: Role, board: Board) -> MatchSession {
    let mut session = MatchSession::new("test-room", role, board);
    session.opponent_joined();
    session
}

fn single_sub_board(x: u8, y: u8) -> Board {
    let mut board = Board::new();
    let ship = Ship::new(ShipClass::new("submarine", 1), coord(x, y), Orientation::Horizontal)
        .unwrap();
    board.place_ship(ship).unwrap();
    board
}

#[tokio::test(flavor = "multi_thread")]
async fn test_bot_match_completes_with_inverse_outcomes() {
    let mut rng1 = SmallRng::seed_from_u64(11);
    let mut rng2 = SmallRng::seed_from_u64(22);
    let board1 = random_fleet(&mut rng1).unwrap();
    let board2 = random_fleet(&mut rng2).unwrap();

    let (t1, t2) = InMemoryTransport::pair();
    let host = async move {
        let mut node = PeerNode::new(
            session(Role::Host, board1),
            Box::new(t1),
            Box::new(BotGunner::new(rng1)),
        );
        let outcome = node.run().await?;
        anyhow::Ok((outcome, node))
    };
    let guest = async move {
        let mut node = PeerNode::new(
            session(Role::Guest, board2),
            Box::new(t2),
            Box::new(BotGunner::new(rng2)),
        );
        let outcome = node.run().await?;
        anyhow::Ok((outcome, node))
    };

    let ((o1, n1), (o2, n2)) = tokio::try_join!(host, guest).unwrap();

    assert_eq!(n1.session().state(), SessionState::Complete);
    assert_eq!(n2.session().state(), SessionState::Complete);
    match (o1, o2) {
        (MatchOutcome::Victory, MatchOutcome::Defeat) => {
            assert_eq!(n1.session().enemy_ships_afloat(), 0);
            assert!(n2.session().board().is_defeated());
        }
        (MatchOutcome::Defeat, MatchOutcome::Victory) => {
            assert_eq!(n2.session().enemy_ships_afloat(), 0);
            assert!(n1.session().board().is_defeated());
        }
        other => panic!("expected one winner and one loser, got {:?}", other),
    }
}

#[tokio::test]
async fn test_drop_before_ready_aborts_as_opponent_left() {
    let (t1, t2) = InMemoryTransport::pair();
    drop(t2);

    let mut node = PeerNode::new(
        session(Role::Host, single_sub_board(3, 3)),
        Box::new(t1),
        Box::new(BotGunner::new(SmallRng::seed_from_u64(1))),
    );
    let outcome = node.run().await.unwrap();
    assert_eq!(outcome, MatchOutcome::OpponentLeft);
    assert_eq!(node.session().state(), SessionState::Complete);
}

#[tokio::test]
async fn test_drop_mid_game_aborts_as_opponent_left() {
    let (t1, mut t2) = InMemoryTransport::pair();

    let peer = tokio::spawn(async move {
        // play along until the first shot arrives, then vanish
        assert_eq!(t2.recv().await.unwrap(), PeerMessage::Ready);
        t2.send(PeerMessage::Ready).await.unwrap();
        let msg = t2.recv().await.unwrap();
        assert!(matches!(msg, PeerMessage::Fire { .. }));
        drop(t2);
    });

    let mut node = PeerNode::new(
        session(Role::Host, single_sub_board(3, 3)),
        Box::new(t1),
        Box::new(BotGunner::new(SmallRng::seed_from_u64(2))),
    );
    let outcome = node.run().await.unwrap();
    assert_eq!(outcome, MatchOutcome::OpponentLeft);
    peer.await.unwrap();
}

#[tokio::test]
async fn test_ready_timeout_aborts_the_wait() {
    let (t1, _t2) = InMemoryTransport::pair();

    let mut node = PeerNode::new(
        session(Role::Host, single_sub_board(3, 3)),
        Box::new(t1),
        Box::new(BotGunner::new(SmallRng::seed_from_u64(3))),
    )
    .with_ready_timeout(Duration::from_millis(50));

    // _t2 stays alive but silent: only the bounded wait can end this
    let outcome = node.run().await.unwrap();
    assert_eq!(outcome, MatchOutcome::OpponentLeft);
}

/// A scripted guest misbehaves (fires while the host holds the token) and
/// then plays a clean kill shot. The bogus attack must leave no trace.
#[tokio::test]
async fn test_out_of_turn_fire_is_ignored_without_state_change() {
    let (t1, mut t2) = InMemoryTransport::pair();

    let peer = tokio::spawn(async move {
        assert_eq!(t2.recv().await.unwrap(), PeerMessage::Ready);
        t2.send(PeerMessage::Ready).await.unwrap();

        // host's turn: this fire is a protocol violation
        t2.send(PeerMessage::Fire { x: 5, y: 5 }).await.unwrap();

        // answer the host's real shot with a miss, taking the token
        let msg = t2.recv().await.unwrap();
        let PeerMessage::Fire { x, y } = msg else {
            panic!("expected the host's shot, got {:?}", msg);
        };
        t2.send(PeerMessage::Result {
            x,
            y,
            hit: false,
            sunk: false,
            ship: None,
        })
        .await
        .unwrap();

        // now legitimately sink the host's only ship
        t2.send(PeerMessage::Fire { x: 3, y: 3 }).await.unwrap();
        let msg = t2.recv().await.unwrap();
        let PeerMessage::Result { hit, sunk, .. } = msg else {
            panic!("expected a result, got {:?}", msg);
        };
        assert!(hit && sunk);
        let msg = t2.recv().await.unwrap();
        assert_eq!(
            msg,
            PeerMessage::Gameover {
                winner: Winner::Opponent
            }
        );
        t2
    });

    let mut node = PeerNode::new(
        session(Role::Host, single_sub_board(3, 3)),
        Box::new(t1),
        Box::new(BotGunner::new(SmallRng::seed_from_u64(4))),
    );
    let outcome = node.run().await.unwrap();
    assert_eq!(outcome, MatchOutcome::Defeat);

    // only the legitimate kill shot ever touched the board
    assert_eq!(node.session().board().attacked().count(), 1);
    assert!(node.session().board().attacked().get(coord(3, 3)));
    peer.await.unwrap();
}

/// Garbage results (for a coordinate we never fired at) are ignored until
/// the real one arrives.
#[tokio::test]
async fn test_mismatched_result_is_ignored() {
    let (t1, mut t2) = InMemoryTransport::pair();

    let peer = tokio::spawn(async move {
        assert_eq!(t2.recv().await.unwrap(), PeerMessage::Ready);
        t2.send(PeerMessage::Ready).await.unwrap();

        let msg = t2.recv().await.unwrap();
        let PeerMessage::Fire { x, y } = msg else {
            panic!("expected a shot, got {:?}", msg);
        };
        // first a result for a coordinate that was never fired at
        t2.send(PeerMessage::Result {
            x: x.wrapping_add(1) % 10,
            y,
            hit: true,
            sunk: false,
            ship: None,
        })
        .await
        .unwrap();
        // then the real answer
        t2.send(PeerMessage::Result {
            x,
            y,
            hit: false,
            sunk: false,
            ship: None,
        })
        .await
        .unwrap();

        // token is with us now; finish the match
        t2.send(PeerMessage::Fire { x: 3, y: 3 }).await.unwrap();
        let _ = t2.recv().await.unwrap();
        let _ = t2.recv().await.unwrap();
        t2
    });

    let mut node = PeerNode::new(
        session(Role::Host, single_sub_board(3, 3)),
        Box::new(t1),
        Box::new(BotGunner::new(SmallRng::seed_from_u64(5))),
    );
    let outcome = node.run().await.unwrap();
    assert_eq!(outcome, MatchOutcome::Defeat);
    peer.await.unwrap();
}
