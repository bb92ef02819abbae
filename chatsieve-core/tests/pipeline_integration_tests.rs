// chatsieve-core/tests/pipeline_integration_tests.rs
//
// End-to-end properties of the filter pipeline: check ordering, verdict
// mapping, and reload atomicity under concurrent classification.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use chatsieve_core::config::{BadwordEntry, FilterConfig, PatternSources};
use chatsieve_core::{BlockReason, FilterManager, FilterPipeline, MessageFilter, Verdict};

fn config_with(badwords: &[(&str, &str)]) -> FilterConfig {
    FilterConfig {
        badwords: badwords
            .iter()
            .map(|(text, replace)| BadwordEntry {
                text: text.to_string(),
                replace: replace.to_string(),
            })
            .collect(),
        patterns: PatternSources::default(),
    }
}

#[test]
fn printable_ascii_always_passes() {
    let manager = FilterManager::new(config_with(&[])).unwrap();
    for text in [
        "",
        "hello world",
        "punctuation: !\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~",
        "digits 0123456789",
    ] {
        assert_eq!(manager.classify(text), Verdict::Pass, "text: {text:?}");
    }
}

#[test]
fn mixed_script_wins_over_banned_phrase() {
    // The phrase would block on its own; the script check must fire first.
    let manager = FilterManager::new(config_with(&[("badword", "")])).unwrap();
    assert_eq!(
        manager.classify("badword café中国"),
        Verdict::Block {
            reason: BlockReason::MixedScript
        }
    );
}

#[test]
fn disallowed_characters_are_blocked() {
    let manager = FilterManager::new(config_with(&[])).unwrap();
    assert_eq!(
        manager.classify("привет"),
        Verdict::Block {
            reason: BlockReason::DisallowedContent
        }
    );
}

#[test]
fn emoji_only_message_passes() {
    let manager = FilterManager::new(config_with(&[])).unwrap();
    assert_eq!(manager.classify("😀🎉"), Verdict::Pass);
}

#[test]
fn banned_phrase_blocks_with_the_phrase() {
    let manager = FilterManager::new(config_with(&[("badword", "")])).unwrap();
    assert_eq!(
        manager.classify("this is a badword test"),
        Verdict::Block {
            reason: BlockReason::BannedPhrase("badword".to_string())
        }
    );
}

#[test]
fn censored_phrase_is_rewritten() {
    let manager = FilterManager::new(config_with(&[("heck", "h*ck")])).unwrap();
    assert_eq!(
        manager.classify("what the heck"),
        Verdict::Rewrite {
            text: "what the h*ck".to_string()
        }
    );
}

#[test]
fn rewritten_output_passes_on_reclassification() {
    let manager = FilterManager::new(config_with(&[("heck", "h*ck")])).unwrap();
    let Verdict::Rewrite { text } = manager.classify("what the heck") else {
        panic!("expected a rewrite");
    };
    assert_eq!(manager.classify(&text), Verdict::Pass);
}

#[test]
fn self_replicating_replacement_terminates() {
    let manager = FilterManager::new(config_with(&[("a", "aa")])).unwrap();
    assert_eq!(
        manager.classify("aaa"),
        Verdict::Rewrite {
            text: "aaaaaa".to_string()
        }
    );
}

#[test]
fn rejected_reload_leaves_classification_intact() {
    let manager = FilterManager::new(config_with(&[("heck", "h*ck")])).unwrap();
    assert!(manager.reload(config_with(&[("", "x")])).is_err());
    assert_eq!(
        manager.classify("what the heck"),
        Verdict::Rewrite {
            text: "what the h*ck".to_string()
        }
    );
}

#[test]
fn reload_is_atomic_under_concurrent_classification() {
    // Generation 1 and every later odd generation rewrite "heck"; even
    // generations ban it outright. Each classification must agree with the
    // generation snapshot it was computed from.
    let rewrite_config = config_with(&[("heck", "h*ck")]);
    let block_config = config_with(&[("heck", "")]);

    let manager = Arc::new(FilterManager::new(rewrite_config.clone()).unwrap());
    let stop = Arc::new(AtomicBool::new(false));

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let manager = Arc::clone(&manager);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    let generation = manager.current();
                    let verdict =
                        FilterPipeline::new(Arc::clone(&generation)).classify("what the heck");
                    if generation.serial() % 2 == 1 {
                        assert_eq!(
                            verdict,
                            Verdict::Rewrite {
                                text: "what the h*ck".to_string()
                            }
                        );
                    } else {
                        assert_eq!(
                            verdict,
                            Verdict::Block {
                                reason: BlockReason::BannedPhrase("heck".to_string())
                            }
                        );
                    }

                    // The manager-level call must land on one of the two
                    // coherent outcomes, never anything mixed.
                    let verdict = manager.classify("what the heck");
                    assert!(
                        verdict
                            == Verdict::Rewrite {
                                text: "what the h*ck".to_string()
                            }
                            || verdict
                                == Verdict::Block {
                                    reason: BlockReason::BannedPhrase("heck".to_string())
                                },
                        "incoherent verdict: {verdict:?}"
                    );
                }
            })
        })
        .collect();

    for _ in 0..200 {
        manager.reload(block_config.clone()).unwrap();
        manager.reload(rewrite_config.clone()).unwrap();
    }

    stop.store(true, Ordering::Relaxed);
    for worker in workers {
        worker.join().unwrap();
    }
}
