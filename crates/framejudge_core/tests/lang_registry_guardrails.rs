use std::collections::HashMap;

use framejudge_core::lang::constructs::{self, ConstructId};
use framejudge_core::lang::languages::{self, LanguageId};

#[test]
fn languages_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, LanguageId> = HashMap::new();

    for info in languages::LANGUAGES {
        assert_eq!(
            languages::from_str(info.item.canonical),
            Some(info.item.id),
            "language canonical spelling not resolvable: {}",
            info.item.canonical
        );
        assert_eq!(
            languages::as_str(info.item.id),
            info.item.canonical,
            "language as_str mismatch for {:?}",
            info.item.id
        );

        if let Some(prev) = seen.insert(info.item.canonical, info.item.id) {
            panic!(
                "duplicate language spelling {:?}: {:?} and {:?}",
                info.item.canonical, prev, info.item.id
            );
        }

        for &alias in info.item.aliases {
            assert_eq!(
                languages::from_str(alias),
                Some(info.item.id),
                "language alias not resolvable: {}",
                alias
            );
            if let Some(prev) = seen.insert(alias, info.item.id) {
                panic!(
                    "duplicate language alias spelling {:?}: {:?} and {:?}",
                    alias, prev, info.item.id
                );
            }
        }
    }
}

#[test]
fn constructs_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, ConstructId> = HashMap::new();

    for info in constructs::CONSTRUCTS {
        assert_eq!(constructs::from_str(info.canonical), Some(info.id));
        assert_eq!(constructs::as_str(info.id), info.canonical);
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!("duplicate construct spelling {:?}: {:?} and {:?}", info.canonical, prev, info.id);
        }
    }
}

#[test]
fn every_language_calls_functions() {
    for info in languages::LANGUAGES {
        assert!(
            info.supports(ConstructId::FunctionCalls),
            "{} cannot call functions",
            info.item.canonical
        );
    }
}

#[test]
fn extensions_are_unique() {
    let mut seen: HashMap<&'static str, LanguageId> = HashMap::new();
    for info in languages::LANGUAGES {
        if let Some(prev) = seen.insert(info.extension, info.item.id) {
            panic!("duplicate extension {:?}: {:?} and {:?}", info.extension, prev, info.item.id);
        }
    }
}

#[test]
fn only_jvm_and_dotnet_need_selectors() {
    let selected: Vec<LanguageId> = languages::LANGUAGES
        .iter()
        .filter(|l| l.needs_selector)
        .map(|l| l.item.id)
        .collect();
    assert_eq!(selected, vec![LanguageId::Java, LanguageId::Kotlin, LanguageId::CSharp]);
}

#[test]
fn c_has_no_exceptions() {
    let c = languages::info_for(LanguageId::C);
    assert!(!c.supports(ConstructId::Exceptions));
    assert!(c.supports(ConstructId::Assignments));
}

#[test]
fn haskell_has_no_objects_or_oracles() {
    let haskell = languages::info_for(LanguageId::Haskell);
    assert_eq!(languages::from_str("runhaskell"), Some(LanguageId::Haskell));
    assert!(haskell.supports(ConstructId::Collections));
    assert!(!haskell.supports(ConstructId::Objects));
    assert!(!haskell.supports(ConstructId::Evaluation));
}
