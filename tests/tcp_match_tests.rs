//! End to end over real sockets: two clients meet through the relay,
//! negotiate a direct TCP peer channel, and play a full bot match.

use std::time::Duration;

use broadside::{
    random_fleet, BotGunner, MatchOutcome, MatchSession, PeerNode, RelayClient, RelayServer,
    SessionState,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::time::timeout;

#[tokio::test(flavor = "multi_thread")]
async fn test_relay_brokered_tcp_match() {
    let server = RelayServer::bind("127.0.0.1:0").await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());

    let play = |seed: u64| async move {
        let mut client = RelayClient::connect(addr).await?;
        let role = client.join_room("tcp-room").await?;
        let transport = timeout(
            Duration::from_secs(10),
            client.establish_peer_link(role, "tcp-room"),
        )
        .await??;

        let mut rng = SmallRng::seed_from_u64(seed);
        let board = random_fleet(&mut rng)?;
        let mut session = MatchSession::new("tcp-room", role, board);
        session.opponent_joined();

        let mut node = PeerNode::new(
            session,
            Box::new(transport),
            Box::new(BotGunner::new(rng)),
        );
        let outcome = node.run().await?;
        anyhow::Ok((role, outcome, node.session().state()))
    };

    let (first, second) = tokio::join!(
        tokio::spawn(play(101)),
        tokio::spawn(play(202)),
    );
    let (role_a, outcome_a, state_a) = first.unwrap().unwrap();
    let (role_b, outcome_b, state_b) = second.unwrap().unwrap();

    // whoever the relay admitted first hosts; seats must differ
    assert_ne!(role_a, role_b);
    assert_eq!(state_a, SessionState::Complete);
    assert_eq!(state_b, SessionState::Complete);
    assert!(
        matches!(
            (outcome_a, outcome_b),
            (MatchOutcome::Victory, MatchOutcome::Defeat)
                | (MatchOutcome::Defeat, MatchOutcome::Victory)
        ),
        "expected one winner and one loser, got {:?}",
        (outcome_a, outcome_b)
    );
}
