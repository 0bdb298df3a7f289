use crate::analysis::abilities::LevelChoice;
use crate::analysis::buckets::BucketMap;
use crate::analysis::draft::META_BRACKET;
use crate::analysis::hero_pool::HeroPool;
use crate::analysis::items::{BuildTendency, ItemStat};
use crate::analysis::matchups::{MatchupRanking, RankedMatchup};
use crate::analysis::patterns::{Direction, Pattern};
use crate::cache::HeroIndex;
use crate::domain::{AccountId, Bracket, HeroId, ItemCatalog, PlayerHeroStat};
use crate::sampling::SkippedMatch;
use crate::service::{
    AbilityReport, DraftReport, ItemReport, PatternReport, PlayerSearchReport, RecentReport,
};
use chrono::DateTime;
use colored::*;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct HeroRow {
    id: String,
    hero: String,
    attribute: String,
    attack: String,
    roles: String,
}

#[derive(Tabled)]
struct ItemRow {
    id: String,
    item: String,
    category: String,
}

#[derive(Tabled)]
struct PoolRow {
    rank: String,
    hero: String,
    games: String,
    wins: String,
    win_rate: String,
}

#[derive(Tabled)]
struct MatchRow {
    #[tabled(rename = "#")]
    number: String,
    date: String,
    hero: String,
    result: String,
    kda: String,
    duration: String,
}

#[derive(Tabled)]
struct BucketRow {
    bucket: String,
    games: String,
    wins: String,
    win_rate: String,
}

#[derive(Tabled)]
struct PatternRow {
    category: String,
    #[tabled(rename = "type")]
    kind: String,
    description: String,
    games: String,
    confidence: String,
}

#[derive(Tabled)]
struct LevelRow {
    level: String,
    ability: String,
    picks: String,
    share: String,
}

#[derive(Tabled)]
struct MatchupRow {
    rank: String,
    opponent: String,
    games: String,
    win_rate: String,
}

#[derive(Tabled)]
struct ItemStatRow {
    rank: String,
    item: String,
    games: String,
    win_rate: String,
}

#[derive(Tabled)]
struct SuggestionRow {
    rank: String,
    hero: String,
    score: String,
    reasons: String,
}

/// A rate in [0, 1] as a percentage with one decimal.
pub fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

fn optional_percent(rate: Option<f64>) -> String {
    rate.map(percent).unwrap_or_else(|| "-".to_string())
}

/// Unix seconds as a UTC date, or "-" when out of range.
pub fn format_start_time(start_time: i64) -> String {
    DateTime::from_timestamp(start_time, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Provider login timestamps as a date; unparseable values pass through.
pub fn format_last_login(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Medal and stars from a rank tier such as 54 (Legend 4).
pub fn format_rank_tier(rank_tier: u32) -> String {
    let medal = (rank_tier / 10) as usize;
    match medal.checked_sub(1).and_then(|idx| Bracket::ALL.get(idx).copied()) {
        Some(Bracket::Immortal) => Bracket::Immortal.to_string(),
        Some(bracket) if bracket != Bracket::Pro => format!("{} {}", bracket, rank_tier % 10),
        _ => format!("Tier {}", rank_tier),
    }
}

pub fn format_duration(duration_secs: u32) -> String {
    format!("{}:{:02}", duration_secs / 60, duration_secs % 60)
}

fn header(title: &str, width: usize) {
    println!("\n{}", title.bold().cyan());
    println!("{}\n", "=".repeat(width).cyan());
}

fn print_table<T: Tabled>(rows: Vec<T>) {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_warning(message: &str) {
    eprintln!("{} {}", "⚠️".yellow(), message.yellow());
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

fn display_skipped(skipped: &[SkippedMatch]) {
    if skipped.is_empty() {
        println!();
        return;
    }
    println!("{}", format!("Skipped {} matches:", skipped.len()).yellow());
    for m in skipped {
        println!("  • {} ({})", m.match_id, m.reason);
    }
    println!();
}

pub fn display_player_search(report: &PlayerSearchReport) {
    let profile = &report.profile;
    let unknown = || "Unknown".to_string();
    header(&format!("🔎 Found player: {}", report.hit.persona_name), 60);

    if let Some(name) = profile
        .persona_name
        .as_deref()
        .filter(|name| *name != report.hit.persona_name)
    {
        println!("{} {}", "Current name:".bold(), name);
    }

    println!("{} {}", "Account ID:".bold(), profile.account_id.to_string().green());
    println!(
        "{} {}",
        "Steam ID:".bold(),
        profile.steam_id.clone().unwrap_or_else(unknown)
    );
    println!(
        "{} {}",
        "Country:".bold(),
        profile.country_code.clone().unwrap_or_else(unknown)
    );
    println!(
        "{} {}",
        "Rank:".bold(),
        profile.rank_tier.map(format_rank_tier).unwrap_or_else(unknown)
    );
    println!(
        "{} {}",
        "Plus Subscriber:".bold(),
        if profile.plus { "Yes" } else { "No" }
    );
    println!(
        "{} {}",
        "Last Login:".bold(),
        profile
            .last_login
            .as_deref()
            .map(format_last_login)
            .unwrap_or_else(unknown)
    );
    println!(
        "{} {}",
        "Profile URL:".bold(),
        profile
            .profile_url
            .clone()
            .unwrap_or_else(|| "Not available".to_string())
    );

    if report.other_hits > 0 {
        println!();
        display_info(&format!(
            "{} other players matched; refine the name if this is not the right account",
            report.other_hits
        ));
    }
    println!();
}

pub fn display_heroes(heroes: &HeroIndex) {
    header(&format!("🦸 HEROES ({})", heroes.all().len()), 80);

    let rows = heroes
        .all()
        .iter()
        .map(|hero| HeroRow {
            id: hero.id.to_string(),
            hero: hero.localized_name.clone(),
            attribute: hero.primary_attr.clone(),
            attack: hero.attack_type.clone(),
            roles: hero.roles.join(", "),
        })
        .collect();
    print_table::<HeroRow>(rows);
}

pub fn display_items(catalog: &ItemCatalog) {
    header(&format!("🛡️ ITEMS ({})", catalog.len()), 60);

    let rows = catalog
        .sorted()
        .into_iter()
        .map(|item| ItemRow {
            id: item.id.to_string(),
            item: item.display_name.clone(),
            category: item.category.clone().unwrap_or_else(|| "-".to_string()),
        })
        .collect();
    print_table::<ItemRow>(rows);
}

fn pool_rows(stats: &[PlayerHeroStat], heroes: &HeroIndex) -> Vec<PoolRow> {
    stats
        .iter()
        .enumerate()
        .map(|(idx, stat)| PoolRow {
            rank: format!("#{}", idx + 1),
            hero: heroes.name(stat.hero_id),
            games: stat.games.to_string(),
            wins: stat.wins.to_string(),
            win_rate: optional_percent(stat.win_rate()),
        })
        .collect()
}

pub fn display_hero_pool(account_id: AccountId, pool: &HeroPool, heroes: &HeroIndex) {
    header(&format!("🎮 HERO POOL for player {}", account_id), 60);

    println!("{}", "Most Played".bold().yellow());
    print_table(pool_rows(&pool.most_played, heroes));

    println!("\n{}", "Most Effective (5+ games)".bold().yellow());
    if pool.most_effective.is_empty() {
        println!("{}", "No hero has enough games yet".yellow());
    } else {
        print_table(pool_rows(&pool.most_effective, heroes));
    }
    println!();
}

pub fn display_recent(account_id: AccountId, report: &RecentReport, heroes: &HeroIndex) {
    let summary = &report.summary;
    header(
        &format!("📊 MATCH HISTORY for player {} (Last {} Games)", account_id, summary.matches),
        80,
    );
    println!(
        "{} {} W / {} L ({} WR)",
        "📈 Overall:".bold(),
        summary.wins.to_string().green(),
        (summary.matches - summary.wins).to_string().red(),
        optional_percent(summary.win_rate)
    );
    println!(
        "{} {:.1} / {:.1} / {:.1}\n",
        "⚔️ Average KDA:".bold(),
        summary.avg_kills,
        summary.avg_deaths,
        summary.avg_assists
    );

    let rows = report
        .records
        .iter()
        .enumerate()
        .map(|(idx, record)| MatchRow {
            number: (idx + 1).to_string(),
            date: format_start_time(record.start_time),
            hero: heroes.name(record.hero_id),
            result: if record.won() {
                "WIN".green().to_string()
            } else {
                "LOSS".red().to_string()
            },
            kda: format!("{}/{}/{}", record.kills, record.deaths, record.assists),
            duration: format_duration(record.duration_secs),
        })
        .collect();
    print_table::<MatchRow>(rows);
    println!();
}

fn bucket_rows(buckets: &BucketMap) -> Vec<BucketRow> {
    buckets
        .iter()
        .filter(|b| b.stats.games > 0)
        .map(|b| BucketRow {
            bucket: b.label.clone(),
            games: b.stats.games.to_string(),
            wins: b.stats.wins.to_string(),
            win_rate: optional_percent(b.stats.win_rate()),
        })
        .collect()
}

fn direction_label(direction: Direction) -> ColoredString {
    match direction {
        Direction::Strength => "strength".green(),
        Direction::Weakness => "weakness".red(),
    }
}

pub fn display_patterns(account_id: AccountId, report: &PatternReport) {
    header(&format!("🔍 PERFORMANCE PATTERNS for player {}", account_id), 80);

    println!(
        "{} {} games, {} WR\n",
        "📈 Baseline:".bold(),
        report.baseline.games,
        optional_percent(report.baseline.win_rate())
    );

    println!("{}", "Game Length".bold().yellow());
    print_table(bucket_rows(&report.timing));

    let roles = bucket_rows(&report.roles);
    if !roles.is_empty() {
        println!("\n{}", "Hero Roles".bold().yellow());
        print_table(roles);
    }

    println!();
    if report.patterns.is_empty() {
        println!("{}", "No significant patterns found in these matches".yellow());
        println!();
        return;
    }

    let rows = report
        .patterns
        .iter()
        .map(|p: &Pattern| PatternRow {
            category: format!("{:?}", p.category),
            kind: direction_label(p.direction).to_string(),
            description: p.description.clone(),
            games: p.sample_size.to_string(),
            confidence: format!("{:.0}%", p.confidence * 100.0),
        })
        .collect();
    print_table::<PatternRow>(rows);

    println!("\n{}", "Top Focus Areas".bold().red());
    for (idx, pattern) in report.top.iter().enumerate() {
        println!("  {}. {}", idx + 1, pattern.recommendation);
    }
    println!();
}

pub fn display_abilities(report: &AbilityReport, heroes: &HeroIndex) {
    header(
        &format!("📚 ABILITY BUILD for {}", heroes.name(report.hero_id)),
        60,
    );
    println!("Based on {} detailed matches", report.sample_size);
    display_skipped(&report.skipped);

    let rows = report
        .levels
        .iter()
        .map(|choice: &LevelChoice| LevelRow {
            level: choice.level.to_string(),
            ability: format!("Ability {}", choice.ability_id),
            picks: choice.count.to_string(),
            share: percent(choice.share),
        })
        .collect();
    print_table::<LevelRow>(rows);
    println!();
}

fn matchup_rows(matchups: &[RankedMatchup], heroes: &HeroIndex) -> Vec<MatchupRow> {
    matchups
        .iter()
        .enumerate()
        .map(|(idx, m)| MatchupRow {
            rank: format!("#{}", idx + 1),
            opponent: heroes.name(m.opponent),
            games: m.games.to_string(),
            win_rate: percent(m.win_rate),
        })
        .collect()
}

pub fn display_matchups(hero_id: HeroId, ranking: &MatchupRanking, heroes: &HeroIndex) {
    header(&format!("⚔️ MATCHUPS for {}", heroes.name(hero_id)), 60);

    if ranking.best.is_empty() {
        println!("{}", "No matchup has 50+ games yet".yellow());
        println!();
        return;
    }

    println!("{}", "Best Against".bold().green());
    print_table(matchup_rows(&ranking.best, heroes));
    println!("\n{}", "Worst Against".bold().red());
    print_table(matchup_rows(&ranking.worst, heroes));
    println!();
}

fn item_rows(stats: &[ItemStat]) -> Vec<ItemStatRow> {
    stats
        .iter()
        .enumerate()
        .map(|(idx, s)| ItemStatRow {
            rank: format!("#{}", idx + 1),
            item: s.name.clone(),
            games: s.games.to_string(),
            win_rate: percent(s.win_rate),
        })
        .collect()
}

pub fn display_item_builds(report: &ItemReport, heroes: &HeroIndex) {
    let builds = &report.builds;
    header(&format!("🛒 ITEM BUILDS for {}", heroes.name(report.hero_id)), 60);
    println!("Based on {} detailed matches", builds.sample_size);
    display_skipped(&report.skipped);

    if builds.most_frequent.is_empty() {
        println!("{}", "No item was bought in more than one sampled match".yellow());
        println!();
        return;
    }

    println!("{}", "Most Frequent".bold().yellow());
    print_table(item_rows(&builds.most_frequent));

    if !builds.highest_win_rate.is_empty() {
        println!("\n{}", "Highest Win Rate (3+ games)".bold().yellow());
        print_table(item_rows(&builds.highest_win_rate));
    }

    if !builds.core_items.is_empty() {
        println!("\n{}", "Core Items".bold().green());
        let names: Vec<&str> = builds.core_items.iter().map(|s| s.name.as_str()).collect();
        println!("  {}", names.join(", "));
    }

    let tendency = match builds.tendency {
        BuildTendency::Farming => "Farming focused".cyan(),
        BuildTendency::Fighting => "Fighting focused".red(),
        BuildTendency::Balanced => "Balanced".normal(),
    };
    println!(
        "\n{} {} (farming items in {} games, fighting items in {} games)\n",
        "Build style:".bold(),
        tendency,
        builds.farming_games,
        builds.fighting_games
    );
}

pub fn display_draft(report: &DraftReport, heroes: &HeroIndex) {
    header("🎯 DRAFT SUGGESTIONS", 80);
    println!("{} {} bracket", "Meta source:".bold(), META_BRACKET);

    let names = |team: &[HeroId]| -> String {
        if team.is_empty() {
            "-".to_string()
        } else {
            team.iter().map(|id| heroes.name(*id)).collect::<Vec<_>>().join(", ")
        }
    };
    println!("{} {}", "Allies:".bold(), names(&report.draft.ally_heroes));
    println!("{} {}", "Enemies:".bold(), names(&report.draft.enemy_heroes));
    if !report.ally_roles.is_empty() {
        println!("{} {}", "Team roles:".bold(), report.ally_roles.join(", "));
    }
    if report.player_history_missing {
        display_warning("No usable hero history for this player, suggestions ignore it");
    }
    println!();

    if report.suggestions.is_empty() {
        println!("{}", "No heroes left to suggest".yellow());
        println!();
        return;
    }

    let rows = report
        .suggestions
        .iter()
        .enumerate()
        .map(|(idx, s)| SuggestionRow {
            rank: format!("#{}", idx + 1),
            hero: s.hero.localized_name.clone(),
            score: s.score.to_string(),
            reasons: s
                .reasons
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        })
        .collect();
    print_table::<SuggestionRow>(rows);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.6, "60.0%")]
    #[case(0.0, "0.0%")]
    #[case(2.0 / 3.0, "66.7%")]
    fn percent_rounds_to_one_decimal(#[case] rate: f64, #[case] expected: &str) {
        assert_eq!(percent(rate), expected);
    }

    #[test]
    fn missing_rate_renders_dash() {
        assert_eq!(optional_percent(None), "-");
    }

    #[rstest]
    #[case("2024-03-01T18:22:05.000Z", "2024-03-01")]
    #[case("yesterday", "yesterday")]
    fn last_login_shows_date(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(format_last_login(raw), expected);
    }

    #[rstest]
    #[case(54, "Legend 4")]
    #[case(11, "Herald 1")]
    #[case(80, "Immortal")]
    #[case(95, "Tier 95")]
    #[case(3, "Tier 3")]
    fn rank_tier_names_the_medal(#[case] tier: u32, #[case] expected: &str) {
        assert_eq!(format_rank_tier(tier), expected);
    }

    #[test]
    fn start_time_is_utc() {
        assert_eq!(format_start_time(1_700_000_000), "2023-11-14 22:13");
    }

    #[rstest]
    #[case(2100, "35:00")]
    #[case(1805, "30:05")]
    fn duration_is_minutes_and_seconds(#[case] secs: u32, #[case] expected: &str) {
        assert_eq!(format_duration(secs), expected);
    }
}
