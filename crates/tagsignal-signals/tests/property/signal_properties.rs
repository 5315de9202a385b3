use proptest::prelude::*;
use tagsignal_core::{EngagementWeights, Item, TermScore, TopTerms};
use tagsignal_signals::{
    calculate_signal, score_engagement, score_item, EngagementCounts, SignalLabel,
};

fn any_item() -> impl Strategy<Value = Item> {
    (
        (0u64..1_000_000, 0u64..1_000_000, 0u64..1_000_000, 0u64..10_000_000),
        -2.0f64..2.0,
        -1.0f64..2.0,
        -0.5f64..1.5,
        prop::collection::vec(("[a-z]{1,8}", 0.0f64..1.0), 0..12),
    )
        .prop_map(|((likes, retweets, replies, views), sentiment, sent_conf, density, terms)| {
            let mut item = Item::new("p");
            item.likes = likes;
            item.retweets = retweets;
            item.replies = replies;
            item.views = views;
            item.sentiment_score = sentiment;
            item.sentiment_confidence = sent_conf;
            item.finance_term_density = density;
            item.top_terms = TopTerms::new(terms.into_iter().map(|(t, s)| TermScore::new(t, s)));
            item
        })
}

proptest! {
    #[test]
    fn item_scores_stay_in_bounds(item in any_item()) {
        let signal = score_item(&item, &EngagementWeights::default());
        prop_assert!((0.0..=1.0).contains(&signal.virality_score));
        prop_assert!((0.0..=1.0).contains(&signal.confidence));
        prop_assert!((-1.0..=1.0).contains(&signal.signal_score));
        prop_assert!(
            signal.confidence_interval.lower <= signal.signal_score
                && signal.signal_score <= signal.confidence_interval.upper,
            "interval {:?} must contain {}",
            signal.confidence_interval,
            signal.signal_score
        );
    }

    #[test]
    fn zero_engagement_is_exactly_zero(
        engagement_weight in 0.0f64..5.0,
        retweet_weight in 0.0f64..5.0,
    ) {
        let weights = EngagementWeights {
            engagement_weight,
            retweet_weight,
            ..EngagementWeights::default()
        };
        let result = score_engagement(EngagementCounts::default(), &weights);
        prop_assert_eq!(result.virality_score, 0.0);
    }

    #[test]
    fn low_confidence_is_always_ignored(
        sentiment in -1.0f64..=1.0,
        virality in 0.0f64..=1.0,
        confidence in 0.0f64..0.3,
    ) {
        let out = calculate_signal(sentiment, virality, confidence);
        prop_assert_eq!(out.signal_label, SignalLabel::Ignore);
    }

    #[test]
    fn signal_is_monotone_in_sentiment(
        a in -1.5f64..1.5,
        b in -1.5f64..1.5,
        virality in 0.0f64..=1.0,
        confidence in 0.0f64..=1.0,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let low = calculate_signal(lo, virality, confidence).signal_score;
        let high = calculate_signal(hi, virality, confidence).signal_score;
        prop_assert!(low <= high, "{} -> {}, {} -> {}", lo, low, hi, high);
    }
}
