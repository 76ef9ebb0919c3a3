use analytics::games::GameStats;
use analytics::overview::{Health, Overview};
use analytics::players::{Snapshot, UserReport};
use analytics::report::{DetailRow, Report};

pub fn render(report: &Report) -> String {
    match report {
        Report::Overview(overview) => render_overview(overview),
        Report::Health(health) => render_health(health),
        Report::Games(games) => render_games(games),
        Report::Timeline(snapshots) => render_timeline(snapshots),
        Report::User(user) => render_user(user),
        Report::Detail(rows) => render_detail(rows),
    }
}

fn render_overview(overview: &Overview) -> String {
    let mut out = String::new();
    out.push_str("Overview\n");
    out.push_str(&format!("  Turnover   {:>14.2}\n", overview.turnover));
    out.push_str(&format!("  Payout     {:>14.2}\n", overview.payout));
    out.push_str(&format!("  GGR        {:>14.2}\n", overview.ggr));
    out.push_str(&format!("  RTP        {:>13.2}%\n", overview.rtp));
    if overview.rtp > 100.0 {
        out.push_str("  Warning: RTP above 100%\n");
    }
    out.push_str(&format!("  Spins      {:>14}\n", overview.spins));
    out.push_str(&format!("  Avg bet    {:>14.2}\n", overview.avg_bet));
    out.push_str(&format!("  Hit rate   {:>13.2}%\n", overview.hit_rate));
    out
}

fn render_health(health: &Health) -> String {
    let mut out = String::new();
    out.push_str("Operational health\n");
    out.push_str(&format!("  Avg DAU            {:>10.1}\n", health.avg_dau));
    out.push_str(&format!("  Avg new users      {:>10.1}\n", health.avg_new_users));
    out.push_str(&format!("  Next day retention {:>9.1}%\n", health.avg_retention));
    out.push_str(&format!("  Spins per user     {:>10.1}\n", health.spins_per_user));
    out.push_str(&format!("  Total users        {:>10}\n", health.total_users));
    out.push_str("\n  Cumulative bet tiers\n");
    for tier in &health.tiers {
        out.push_str(&format!("    >= {:>9}  {:>6} users\n",
                              tier.threshold, tier.users));
    }
    out.push_str("\n  Daily active users\n");
    for point in &health.dau {
        out.push_str(&format!("    {}  {:>6}\n", point.date, point.users));
    }
    out
}

fn render_games(games: &[GameStats]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>6} {:>14} {:>14} {:>12} {:>8} {:>10} {:>9} {:>9}\n",
        "Game", "Turnover", "Payout", "GGR", "RTP%", "Volatility",
        "HitRate%", "Winner%"));
    for game in games {
        out.push_str(&format!(
            "{:>6} {:>14.2} {:>14.2} {:>12.2} {:>8.2} {:>10.2} {:>9.2} {:>9.2}\n",
            game.game, game.turnover, game.payout, game.ggr, game.rtp,
            game.volatility, game.hit_rate, game.winner_pct));
    }
    out.push_str("\nWin bands (small/big/mega/super, avg multiplier)\n");
    for game in games {
        out.push_str(&format!("{:>6} {:>6} {:>6} {:>6} {:>6} {:>10.2}\n",
            game.game, game.small_wins, game.big_wins, game.mega_wins,
            game.super_wins, game.avg_multiplier));
    }
    out
}

fn render_timeline(snapshots: &[Snapshot]) -> String {
    let mut out = String::new();
    out.push_str("PnL evolution\n");
    for snapshot in snapshots {
        let winners = snapshot.points.iter().filter(|p| p.winner).count();
        let losers = snapshot.points.len() - winners;
        let best = snapshot.points.iter()
            .map(|p| p.cum_pnl)
            .fold(f64::MIN, f64::max);
        let worst = snapshot.points.iter()
            .map(|p| p.cum_pnl)
            .fold(f64::MAX, f64::min);
        if snapshot.points.is_empty() {
            out.push_str(&format!("  {}  no activity yet\n", snapshot.at));
        } else {
            out.push_str(&format!(
                "  {}  {:>5} winners {:>5} losers  best {:>12.2} worst {:>12.2}\n",
                snapshot.at, winners, losers, best, worst));
        }
    }
    out
}

fn render_user(user: &UserReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("User {}\n", user.user));
    out.push_str(&format!("  Tags       {}\n", user.tags.join(" | ")));
    out.push_str(&format!("  Turnover   {:>14.2}\n", user.turnover));
    out.push_str(&format!("  PnL        {:>14.2}\n", user.pnl));
    out.push_str(&format!("  Spins      {:>14}\n", user.spins));
    out.push_str(&format!("  RTP        {:>13.2}%\n", user.rtp));
    out.push_str(&format!("  Max win    {:>14.2}\n", user.max_win));
    out.push_str(&format!("  GGR share  {:>13.4}%\n", user.ggr_share));
    out.push_str("\n  Journey (* marks a game switch)\n");
    for point in &user.journey {
        let marker = if point.switched { "*" } else { " " };
        let pool = match point.pool {
            Some(pool) => format!("  pool {:>10.2}", pool),
            None       => String::new(),
        };
        out.push_str(&format!(
            "  {:>5} {} {} game {:>4} {:>12.2} {:>14.2}{}\n",
            point.seq, marker, point.created, point.game, point.amount,
            point.cumulative_pnl, pool));
    }
    out
}

fn render_detail(rows: &[DetailRow]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>8} {:<19} {:>10} {:>6} {:>12} {:>4} {:>10}\n",
        "Id", "Time", "User", "Game", "Amount", "Kind", "Pool"));
    for row in rows {
        let pool = match row.pool {
            Some(pool) => format!("{:>10.2}", pool),
            None       => format!("{:>10}", "-"),
        };
        out.push_str(&format!("{:>8} {:<19} {:>10} {:>6} {:>12.2} {:>4} {}\n",
            row.id, row.created, row.user, row.game, row.amount, row.kind,
            pool));
    }
    out
}
