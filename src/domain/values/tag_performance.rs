//! Per-tag performance aggregation.
//!
//! Groups a strategy's trades by `(category id, tag text)` and reports
//! counts, win/loss split, win rate and P&L for each pair. Keying on the
//! category id keeps identical tag texts in different categories apart.
//!
//! Precondition: `selections` keys refer to categories of the strategy being
//! analysed. Keys that no longer resolve (the category was renamed away or
//! removed after the trade was logged) are reported under
//! [`UNKNOWN_CATEGORY`] with no layer instead of failing.

use crate::domain::entities::strategy::Strategy;
use crate::domain::entities::trade::Trade;
use crate::domain::values::category_index::UNKNOWN_CATEGORY;
use crate::domain::values::layer::{LayerFilter, LayerKey};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

/// Smallest sample a tag needs before it can appear on the leaderboard.
/// One trade cannot say anything about a win rate; two is a floor against
/// the worst small-sample noise, not a significance test.
pub const MIN_LEADERBOARD_SAMPLE: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagStats {
    pub tag: String,
    pub category_id: String,
    pub category_name: String,
    /// `None` when the category id is not part of the strategy.
    pub layer_key: Option<LayerKey>,
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    /// Percentage in `0..=100`.
    pub win_rate: f64,
    pub total_pnl: f64,
    pub avg_pnl: f64,
}

impl TagStats {
    /// Ranking used for sorting and the leaderboard: higher win rate first,
    /// then higher total P&L.
    pub fn rank_cmp(a: &TagStats, b: &TagStats) -> Ordering {
        b.win_rate
            .total_cmp(&a.win_rate)
            .then_with(|| b.total_pnl.total_cmp(&a.total_pnl))
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    category_name: String,
    layer_key: Option<LayerKey>,
    total_trades: usize,
    wins: usize,
    losses: usize,
    total_pnl: f64,
}

/// Aggregates tag statistics for `strategy`.
///
/// Trades belonging to other strategies are skipped, so the whole journal
/// may be passed in. Output is sorted by [`TagStats::rank_cmp`]; ties keep
/// `(category id, tag)` order, which makes the result deterministic.
pub fn aggregate_by_tag(
    trades: &[Trade],
    strategy: &Strategy,
    layer_filter: LayerFilter,
) -> Vec<TagStats> {
    let index = strategy.index();
    let mut buckets: BTreeMap<(String, String), Accumulator> = BTreeMap::new();
    let mut considered = 0usize;

    for trade in trades.iter().filter(|t| t.strategy_id == strategy.id) {
        considered += 1;
        let is_gain = trade.is_gain();

        for (category_id, tags) in &trade.selections {
            let resolved = index.resolve(category_id);
            let mut seen: HashSet<&str> = HashSet::new();

            for tag in tags {
                // a tag listed twice in one selection still counts one trade
                if !seen.insert(tag.as_str()) {
                    continue;
                }
                let acc = buckets
                    .entry((category_id.clone(), tag.clone()))
                    .or_insert_with(|| Accumulator {
                        category_name: resolved
                            .map(|r| r.name.clone())
                            .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
                        layer_key: resolved.map(|r| r.layer),
                        ..Default::default()
                    });
                acc.total_trades += 1;
                if is_gain {
                    acc.wins += 1;
                } else {
                    acc.losses += 1;
                }
                acc.total_pnl += trade.pnl;
            }
        }
    }

    let mut results: Vec<TagStats> = buckets
        .into_iter()
        .filter(|(_, acc)| layer_filter.matches(acc.layer_key))
        .map(|((category_id, tag), acc)| {
            let (win_rate, avg_pnl) = if acc.total_trades > 0 {
                let n = acc.total_trades as f64;
                (acc.wins as f64 / n * 100.0, acc.total_pnl / n)
            } else {
                (0.0, 0.0)
            };
            TagStats {
                tag,
                category_id,
                category_name: acc.category_name,
                layer_key: acc.layer_key,
                total_trades: acc.total_trades,
                wins: acc.wins,
                losses: acc.losses,
                win_rate,
                total_pnl: acc.total_pnl,
                avg_pnl,
            }
        })
        .collect();

    results.sort_by(TagStats::rank_cmp);

    tracing::debug!(
        strategy = %strategy.id,
        trades = considered,
        tags = results.len(),
        filter = %layer_filter,
        "aggregated tag performance"
    );
    results
}

/// Best tag per layer, in layer order, among entries with at least
/// [`MIN_LEADERBOARD_SAMPLE`] trades. Layers with no qualifying tag are
/// left out, so the result holds between zero and four entries.
pub fn leaderboard(stats: &[TagStats]) -> Vec<TagStats> {
    LayerKey::ALL
        .into_iter()
        .filter_map(|layer| {
            stats
                .iter()
                .filter(|s| s.layer_key == Some(layer) && s.total_trades >= MIN_LEADERBOARD_SAMPLE)
                .min_by(|a, b| TagStats::rank_cmp(a, b))
                .cloned()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::strategy::{Category, Layers, Tag};
    use crate::domain::entities::trade::Selections;
    use crate::domain::values::selection_type::SelectionType;
    use crate::domain::values::trade_direction::TradeDirection;
    use crate::domain::values::trade_outcome::TradeOutcome;
    use chrono::Utc;

    fn strategy() -> Strategy {
        let mut s = Strategy::support_and_resistance();
        s.layers = Layers {
            layer1: vec![Category {
                id: "cat-a".into(),
                name: "SETUP".into(),
                selection_type: SelectionType::Single,
                tags: vec![Tag::new("X", "#fff"), Tag::new("Y", "#000")],
            }],
            layer2: vec![Category {
                id: "cat-b".into(),
                name: "BIAS".into(),
                selection_type: SelectionType::Multi,
                tags: vec![Tag::new("X", "#fff")],
            }],
            ..Default::default()
        };
        s
    }

    fn trade(pnl: f64, selections: &[(&str, &[&str])]) -> Trade {
        let selections: Selections = selections
            .iter()
            .map(|(cat, tags)| (cat.to_string(), tags.iter().map(|t| t.to_string()).collect()))
            .collect();
        Trade {
            id: uuid::Uuid::new_v4().to_string(),
            time: Utc::now(),
            pair: "NQ".into(),
            direction: TradeDirection::Long,
            size: None,
            entry: 100.0,
            exit: 100.0 + pnl,
            pnl,
            outcome: TradeOutcome::from_pnl(pnl),
            strategy_id: "strat-default-sr".into(),
            selections,
            reflection: None,
        }
    }

    fn find<'a>(stats: &'a [TagStats], cat: &str, tag: &str) -> &'a TagStats {
        stats
            .iter()
            .find(|s| s.category_id == cat && s.tag == tag)
            .unwrap()
    }

    #[test]
    fn test_worked_example() {
        let trades = vec![
            trade(100.0, &[("cat-a", &["X"])]),
            trade(-50.0, &[("cat-a", &["X"])]),
            trade(200.0, &[("cat-a", &["Y"])]),
        ];
        let stats = aggregate_by_tag(&trades, &strategy(), LayerFilter::All);
        assert_eq!(stats.len(), 2);

        assert_eq!(stats[0].tag, "Y");
        assert_eq!(stats[0].total_trades, 1);
        assert_eq!(stats[0].wins, 1);
        assert_eq!(stats[0].losses, 0);
        assert_eq!(stats[0].win_rate, 100.0);
        assert_eq!(stats[0].total_pnl, 200.0);
        assert_eq!(stats[0].avg_pnl, 200.0);

        let x = &stats[1];
        assert_eq!(x.tag, "X");
        assert_eq!((x.total_trades, x.wins, x.losses), (2, 1, 1));
        assert_eq!(x.win_rate, 50.0);
        assert_eq!(x.total_pnl, 50.0);
        assert_eq!(x.avg_pnl, 25.0);
        assert_eq!(x.category_name, "SETUP");
        assert_eq!(x.layer_key, Some(LayerKey::Layer1));

        let board = leaderboard(&stats);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].tag, "X");
    }

    #[test]
    fn test_same_text_in_two_categories_kept_apart() {
        let trades = vec![
            trade(10.0, &[("cat-a", &["X"]), ("cat-b", &["X"])]),
            trade(-10.0, &[("cat-b", &["X"])]),
        ];
        let stats = aggregate_by_tag(&trades, &strategy(), LayerFilter::All);
        assert_eq!(stats.len(), 2);
        assert_eq!(find(&stats, "cat-a", "X").total_trades, 1);
        assert_eq!(find(&stats, "cat-b", "X").total_trades, 2);
        assert_eq!(find(&stats, "cat-b", "X").category_name, "BIAS");
    }

    #[test]
    fn test_unknown_category_degrades() {
        let trades = vec![trade(-5.0, &[("cat-deleted", &["OLD"])])];
        let stats = aggregate_by_tag(&trades, &strategy(), LayerFilter::All);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].category_name, UNKNOWN_CATEGORY);
        assert_eq!(stats[0].layer_key, None);
        assert_eq!(stats[0].losses, 1);

        // unresolved entries never pass a specific layer filter
        let filtered = aggregate_by_tag(&trades, &strategy(), LayerFilter::Layer(LayerKey::Layer1));
        assert!(filtered.is_empty());
        assert!(leaderboard(&stats).is_empty());
    }

    #[test]
    fn test_empty_selections_contribute_nothing() {
        let trades = vec![trade(10.0, &[]), trade(5.0, &[("cat-a", &[])])];
        assert!(aggregate_by_tag(&trades, &strategy(), LayerFilter::All).is_empty());
    }

    #[test]
    fn test_other_strategies_are_skipped() {
        let mut foreign = trade(10.0, &[("cat-a", &["X"])]);
        foreign.strategy_id = "strat-other".into();
        let trades = vec![foreign, trade(-1.0, &[("cat-a", &["X"])])];
        let stats = aggregate_by_tag(&trades, &strategy(), LayerFilter::All);
        assert_eq!(stats[0].total_trades, 1);
        assert_eq!(stats[0].wins, 0);
    }

    #[test]
    fn test_duplicate_tag_in_one_selection_counts_once() {
        let trades = vec![trade(10.0, &[("cat-b", &["X", "X"])])];
        let stats = aggregate_by_tag(&trades, &strategy(), LayerFilter::All);
        assert_eq!(stats[0].total_trades, 1);
        assert_eq!(stats[0].total_pnl, 10.0);
    }

    #[test]
    fn test_breakeven_is_a_win() {
        let trades = vec![trade(0.0, &[("cat-a", &["X"])])];
        let stats = aggregate_by_tag(&trades, &strategy(), LayerFilter::All);
        assert_eq!(stats[0].wins, 1);
        assert_eq!(stats[0].win_rate, 100.0);
    }

    #[test]
    fn test_layer_filter() {
        let trades = vec![trade(10.0, &[("cat-a", &["X"]), ("cat-b", &["X"])])];
        let stats = aggregate_by_tag(&trades, &strategy(), LayerFilter::Layer(LayerKey::Layer2));
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].category_id, "cat-b");
    }

    #[test]
    fn test_ties_broken_by_total_pnl() {
        let trades = vec![
            trade(10.0, &[("cat-a", &["X"])]),
            trade(30.0, &[("cat-a", &["Y"])]),
        ];
        let stats = aggregate_by_tag(&trades, &strategy(), LayerFilter::All);
        assert_eq!(stats[0].tag, "Y");
        assert_eq!(stats[1].tag, "X");
    }

    #[test]
    fn test_leaderboard_one_per_layer_in_order() {
        let trades = vec![
            trade(10.0, &[("cat-a", &["X"]), ("cat-b", &["X"])]),
            trade(20.0, &[("cat-a", &["X"]), ("cat-b", &["X"])]),
            trade(-5.0, &[("cat-a", &["Y"])]),
            trade(50.0, &[("cat-a", &["Y"])]),
        ];
        let stats = aggregate_by_tag(&trades, &strategy(), LayerFilter::All);
        let board = leaderboard(&stats);
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].layer_key, Some(LayerKey::Layer1));
        assert_eq!(board[0].tag, "X");
        assert_eq!(board[1].layer_key, Some(LayerKey::Layer2));
    }

    #[test]
    fn test_leaderboard_does_not_need_sorted_input() {
        let trades = vec![
            trade(10.0, &[("cat-a", &["X"])]),
            trade(-10.0, &[("cat-a", &["X"])]),
            trade(10.0, &[("cat-a", &["Y"])]),
            trade(10.0, &[("cat-a", &["Y"])]),
        ];
        let mut stats = aggregate_by_tag(&trades, &strategy(), LayerFilter::All);
        stats.reverse();
        let board = leaderboard(&stats);
        assert_eq!(board[0].tag, "Y");
    }

    #[test]
    fn test_properties_hold() {
        let trades = vec![
            trade(10.0, &[("cat-a", &["X"]), ("cat-b", &["X"])]),
            trade(-3.0, &[("cat-a", &["Y"]), ("cat-b", &["X"])]),
            trade(7.5, &[("cat-a", &["X"])]),
            trade(-2.0, &[("cat-gone", &["Z"])]),
            trade(0.0, &[("cat-a", &["Y"])]),
        ];
        let stats = aggregate_by_tag(&trades, &strategy(), LayerFilter::All);
        for s in &stats {
            assert_eq!(s.wins + s.losses, s.total_trades);
            assert!((0.0..=100.0).contains(&s.win_rate));
            let expected = trades
                .iter()
                .filter(|t| {
                    t.selections
                        .get(&s.category_id)
                        .is_some_and(|tags| tags.contains(&s.tag))
                })
                .count();
            assert_eq!(s.total_trades, expected);
        }
        for pair in stats.windows(2) {
            assert!(pair[0].win_rate >= pair[1].win_rate);
            if pair[0].win_rate == pair[1].win_rate {
                assert!(pair[0].total_pnl >= pair[1].total_pnl);
            }
        }
        let board = leaderboard(&stats);
        assert!(board.len() <= 4);
        assert!(board.iter().all(|s| s.total_trades >= MIN_LEADERBOARD_SAMPLE));

        assert_eq!(stats, aggregate_by_tag(&trades, &strategy(), LayerFilter::All));
    }
}
