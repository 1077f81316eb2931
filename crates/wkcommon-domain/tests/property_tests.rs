//! Property tests for token identity and host item classification

use proptest::prelude::*;
use serde_json::json;
use wkcommon_domain::{DisplayedItem, HostItem, VocabularyToken};

proptest! {
    #[test]
    fn token_equality_is_exact(a in "\\PC{1,8}", b in "\\PC{1,8}") {
        let ta = VocabularyToken::new(a.clone()).unwrap();
        let tb = VocabularyToken::new(b.clone()).unwrap();
        prop_assert_eq!(ta == tb, a == b);
        prop_assert_eq!(ta.as_str(), a.as_str());
    }

    #[test]
    fn padded_token_is_a_different_key(word in "\\PC{1,8}", pad in "[ \\t　]{1,3}") {
        let plain = VocabularyToken::new(word.clone()).unwrap();
        let padded = VocabularyToken::new(format!("{}{}", pad, word)).unwrap();
        prop_assert_ne!(plain, padded);
    }

    #[test]
    fn vocab_without_readings_is_lookupable(word in "\\PC{1,8}") {
        let host = HostItem {
            voc: Some(word.clone()),
            ..Default::default()
        };
        prop_assert_eq!(
            DisplayedItem::from(&host),
            DisplayedItem::Vocabulary(VocabularyToken::new(word).unwrap())
        );
    }

    #[test]
    fn any_reading_field_hides_the_item(
        word in proptest::option::of("\\PC{0,8}"),
        reading in "\\PC{1,4}",
        on_side in any::<bool>(),
    ) {
        let field = Some(json!([reading]));
        let host = HostItem {
            voc: word,
            on: if on_side { field.clone() } else { None },
            kun: if on_side { None } else { field },
        };
        prop_assert_eq!(DisplayedItem::from(&host), DisplayedItem::NonVocabulary);
    }
}
