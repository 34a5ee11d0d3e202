//! End-to-end demo of the quiz engine.
//!
//! Run with: `cargo run --example demo`
//!
//! This example shows `vocab_battle` working end to end:
//!
//! 1. **Pool loading** — a small bundled-style JSON list is parsed into a
//!    word pool.
//! 2. **A full session** — five rounds are played with a fixed RNG seed, so
//!    the output is deterministic. With `OPENAI_API_KEY` set the distractors
//!    come from the oracle (and land in the cache); without it every round
//!    uses the pool-sampling fallback — the session plays either way.
//! 3. **Capture workflow** — a vision-model reply is parsed into candidates
//!    and saved, then read back as an alternate word pool.
//!
//! ## Key concepts demonstrated
//!
//! - `OracleConfig::from_env()` — the only place the environment is read;
//!   the engine itself sees credentials purely as injected configuration.
//! - `play_round` — begin round, resolve options, apply the answer set.
//! - The 80/20 direction bias: most rounds ask word → meaning.

use rand::rngs::StdRng;
use rand::SeedableRng;

use vocab_battle::{
    load_bundled, parse_vision_reply, play_round, save_candidates, OptionResolver, OracleClient,
    OracleConfig, QuizSession, SessionMode, WordStore,
};

const WORDS_JSON: &str = r#"[
    {"english": "apple",   "japanese": "りんご"},
    {"english": "dog",     "japanese": "犬、イヌ"},
    {"english": "cat",     "japanese": "猫"},
    {"english": "bird",    "japanese": "鳥"},
    {"english": "river",   "japanese": "川"},
    {"english": "mountain","japanese": "山"},
    {"english": "book",    "japanese": "本"},
    {"english": "rain",    "japanese": "雨"}
]"#;

#[tokio::main]
async fn main() {
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(4004);
    let pool = load_bundled(WORDS_JSON).expect("demo word list is valid JSON");

    let config = OracleConfig::from_env();
    let oracle_present = config.api_key.is_some();
    let oracle = oracle_present.then(|| OracleClient::new(config));

    let store = WordStore::open_in_memory().expect("in-memory store");
    let resolver = OptionResolver::new(store, oracle);

    println!();
    println!("══ Quiz session: 5 rounds, seed=4004 ══");
    println!(
        "   Distractors: {}",
        if oracle_present { "oracle (cached per word + direction)" } else { "pool fallback (no credential)" }
    );
    println!();

    let mut session = QuizSession::new(pool, SessionMode::FixedRounds(5), &mut rng)
        .expect("demo pool is not empty");

    let mut round = 1;
    while let Some(prompt) = play_round(&mut session, &resolver, &mut rng).await {
        let answers = session
            .current_answers()
            .expect("answer set was just applied")
            .clone();

        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!(
            "  Round {round}  [{}]  Q: {}",
            prompt.direction,
            prompt.direction.prompt(&prompt.item)
        );
        for option in &answers.options {
            let marker = if answers.is_correct(option) { "✓" } else { " " };
            println!("    {marker} {option}");
        }

        // Auto-play: always pick the right answer.
        session.submit(&answers.correct_answer);
        round += 1;
    }

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  Final score: {}  ({} rounds)", session.score(), session.rounds_completed());
    println!();

    // ── Capture workflow ─────────────────────────────────────────────────────
    // A vision-model reply (code fence and all) becomes stored vocabulary,
    // which can then seed a session of its own.
    println!("══ Capture workflow ══");
    println!();

    let vision_reply = "```json\n[\
        {\"word\": \"umbrella\", \"meaning\": \"傘\"},\
        {\"word\": \"window\", \"meaning\": \"窓\"}\
    ]\n```";
    let candidates = parse_vision_reply(vision_reply).expect("demo reply is well-formed");
    let saved = save_candidates(resolver.store(), &candidates, 0).expect("store is writable");
    println!("  Parsed {} candidates, saved {saved}", candidates.len());

    let captured = resolver.store().captured_words().expect("store is readable");
    for word in &captured {
        println!("    {} → {}", word.word, word.meaning);
    }
    println!();
}
