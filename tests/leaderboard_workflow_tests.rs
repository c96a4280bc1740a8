mod utils;

use numguess::{AppError, LeaderboardBuilder, LeaderboardLimit};
use utils::{game, TestSetupBuilder};

#[tokio::test]
async fn test_three_game_user_stats() {
    let setup = TestSetupBuilder::new().with_players(vec!["alice"]).build().await;
    let alice = setup.player("alice").id.clone();
    let recorder = setup.recorder();

    recorder.record_score(game(&alice, 10.0, false)).await.unwrap();
    recorder.record_score(game(&alice, 50.0, true)).await.unwrap();
    recorder.record_score(game(&alice, 80.0, true)).await.unwrap();

    let stats = setup.stats().get_user_stats(&alice).await.unwrap();

    assert_eq!(stats.total_games, 3);
    assert_eq!(stats.total_wins, 2);
    assert_eq!(stats.win_rate, 67);
    assert_eq!(stats.best_score, 80.0);
    assert_eq!(stats.longest_streak, 2);
}

#[tokio::test]
async fn test_unplayed_user_has_zero_stats_and_no_rank() {
    let setup = TestSetupBuilder::new().with_players(vec!["alice"]).build().await;
    let alice = &setup.player("alice").id;
    let stats = setup.stats();

    let user_stats = stats.get_user_stats(alice).await.unwrap();
    assert_eq!(user_stats.total_games, 0);
    assert_eq!(user_stats.win_rate, 0);
    assert_eq!(user_stats.longest_streak, 0);

    assert!(stats.get_user_rank(alice).await.unwrap().is_none());
}

#[tokio::test]
async fn test_recording_for_unknown_user_appends_nothing() {
    let setup = TestSetupBuilder::new().with_two_players().build().await;

    let result = setup
        .recorder()
        .record_score(game("no-such-user", 10.0, true))
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(setup.scores.record_count().await, 0);
}

#[tokio::test]
async fn test_streak_outranks_best_score_and_wins() {
    let setup = TestSetupBuilder::new().with_two_players().build().await;
    let alice = setup.player("alice").id.clone();
    let bob = setup.player("bob").id.clone();
    let recorder = setup.recorder();

    // alice: best score 100, three wins, never two in a row
    for (score, is_win) in [
        (100.0, true),
        (0.0, false),
        (60.0, true),
        (0.0, false),
        (70.0, true),
    ] {
        recorder.record_score(game(&alice, score, is_win)).await.unwrap();
    }
    // bob: lower best score, fewer wins overall but a longer streak
    for (score, is_win) in [(0.0, false), (90.0, true), (20.0, true)] {
        recorder.record_score(game(&bob, score, is_win)).await.unwrap();
    }

    let leaderboard = setup.stats().get_leaderboard(2).await.unwrap();

    assert_eq!(leaderboard.len(), 2);
    assert_eq!(leaderboard[0].user_id, bob);
    assert_eq!(leaderboard[0].longest_streak, 2);
    assert_eq!(leaderboard[0].rank, 1);
    assert_eq!(leaderboard[1].user_id, alice);
    assert_eq!(leaderboard[1].best_score, 100.0);
    assert_eq!(leaderboard[1].total_wins, 3);
    assert_eq!(leaderboard[1].rank, 2);
}

#[tokio::test]
async fn test_leaderboard_order_ranks_and_idempotence() {
    let setup = TestSetupBuilder::new()
        .with_players(vec!["alice", "bob", "carol", "dave", "erin"])
        .build()
        .await;
    let recorder = setup.recorder();

    let histories: [(&str, &[(f64, bool)]); 5] = [
        ("alice", &[(40.0, true), (10.0, false), (30.0, true)]),
        ("bob", &[(55.0, true), (45.0, true)]),
        ("carol", &[(20.0, false)]),
        ("dave", &[(70.0, true), (15.0, true), (5.0, true)]),
        ("erin", &[(35.0, true), (25.0, false)]),
    ];
    for (name, games) in histories {
        let id = setup.player(name).id.clone();
        for (score, is_win) in games {
            recorder.record_score(game(&id, *score, *is_win)).await.unwrap();
        }
    }

    let stats = setup.stats();
    let first = stats.get_leaderboard(10).await.unwrap();
    let second = stats.get_leaderboard(10).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 5);
    assert_eq!(
        first.iter().map(|e| e.rank).collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5]
    );
    for pair in first.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            a.longest_streak > b.longest_streak
                || (a.longest_streak == b.longest_streak && a.total_wins >= b.total_wins)
        );
    }
    for entry in &first {
        assert!((0.0..=100.0).contains(&entry.win_rate));
    }
    assert_eq!(first[0].name, "dave");
}

#[tokio::test]
async fn test_rank_matches_unbounded_leaderboard() {
    let setup = TestSetupBuilder::new()
        .with_players(vec!["alice", "bob", "carol"])
        .build()
        .await;
    let recorder = setup.recorder();
    for (name, score, is_win) in [
        ("alice", 10.0, true),
        ("bob", 90.0, false),
        ("carol", 30.0, true),
        ("carol", 30.0, true),
    ] {
        let id = setup.player(name).id.clone();
        recorder.record_score(game(&id, score, is_win)).await.unwrap();
    }

    let builder = LeaderboardBuilder::new(setup.scores.clone(), setup.users.clone());
    let everyone = builder.build(LeaderboardLimit::Unbounded).await.unwrap();

    for entry in &everyone {
        let ranked = setup
            .stats()
            .get_user_rank(&entry.user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&ranked, entry);
    }
    assert_eq!(everyone[0].name, "carol");
}

#[tokio::test]
async fn test_history_second_page_of_twenty_five() {
    let setup = TestSetupBuilder::new().with_players(vec!["alice"]).build().await;
    let alice = setup.player("alice").id.clone();
    let recorder = setup.recorder();
    for i in 0..25 {
        recorder
            .record_score(game(&alice, i as f64, i % 3 == 0))
            .await
            .unwrap();
    }

    let history = setup
        .stats()
        .get_user_game_history(&alice, 2, 20)
        .await
        .unwrap();

    assert_eq!(history.records.len(), 5);
    assert_eq!(history.pagination.current_page, 2);
    assert_eq!(history.pagination.total_pages, 2);
    assert_eq!(history.pagination.total_records, 25);
    assert!(!history.pagination.has_next);
    assert!(history.pagination.has_prev);
    // Oldest games land on the last page, newest first within it
    assert_eq!(history.records[0].score, 4.0);
    assert_eq!(history.records[4].score, 0.0);
}

#[tokio::test]
async fn test_leaderboard_stats_follow_new_records() {
    let setup = TestSetupBuilder::new().with_two_players().build().await;
    let alice = setup.player("alice").id.clone();
    let bob = setup.player("bob").id.clone();
    let recorder = setup.recorder();
    let stats = setup.stats();

    recorder.record_score(game(&alice, 40.0, true)).await.unwrap();
    let before = stats.get_leaderboard_stats().await.unwrap();
    assert_eq!(before.total_players, 1);
    assert_eq!(before.total_games, 1);

    recorder.record_score(game(&bob, 80.0, false)).await.unwrap();
    recorder.record_score(game(&alice, 60.0, true)).await.unwrap();
    let after = stats.get_leaderboard_stats().await.unwrap();

    assert_eq!(after.total_players, 2);
    assert_eq!(after.total_games, 3);
    assert_eq!(after.total_wins, 2);
    assert_eq!(after.win_rate, 67);
    assert_eq!(after.top_score, 80.0);
    assert_eq!(after.average_score, 60);
    assert_eq!(after.longest_streak, 2);
}
