use manometer::answers::Answer;
use manometer::forest::ForestConfig;
use manometer::model::{ModelConfig, TrainedModel};
use manometer::pipeline::{parse_answers, ScoreEngine};
use manometer::recommend;
use manometer::synthesis::SynthesisConfig;
use tempfile::tempdir;

fn small_synthesis() -> SynthesisConfig {
    SynthesisConfig {
        samples: 300,
        seed: 42,
    }
}

fn small_model_config() -> ModelConfig {
    ModelConfig {
        forest: ForestConfig {
            trees: 24,
            ..ForestConfig::default()
        },
    }
}

fn small_engine() -> ScoreEngine {
    ScoreEngine::train(&small_synthesis(), small_model_config()).expect("engine should fit")
}

fn answers(json: &str) -> Vec<Answer> {
    parse_answers(json).expect("fixture answers should decode")
}

#[test]
fn one_engine_serves_many_assessments() {
    let engine = small_engine();
    let payloads = [
        "[]",
        r#"[{"questionId":1,"value":9}]"#,
        r#"[{"questionId":2,"value":4.5},{"questionId":5,"value":"Daily"}]"#,
        r#"[{"questionId":3,"value":0},{"questionId":4,"value":"Poor"}]"#,
    ];
    for payload in payloads {
        let result = engine.assess(&answers(payload)).expect("assessment succeeds");
        assert!(result.score <= 100);
        assert_eq!(result.recommendations[0], recommend::BASELINE);
    }
}

#[test]
fn settled_profile_gets_only_the_baseline_advice() {
    let engine = small_engine();
    let result = engine
        .assess(&answers(
            r#"[{"questionId":1,"value":1},{"questionId":2,"value":9},
                {"questionId":3,"value":6},{"questionId":4,"value":"Excellent"},
                {"questionId":5,"value":"Daily"}]"#,
        ))
        .unwrap();
    assert_eq!(result.recommendations, vec![recommend::BASELINE.to_string()]);
}

#[test]
fn duplicate_question_ids_use_the_last_answer() {
    let engine = small_engine();
    let duplicated = engine
        .assess(&answers(
            r#"[{"questionId":1,"value":2},{"questionId":1,"value":9}]"#,
        ))
        .unwrap();
    let direct = engine
        .assess(&answers(r#"[{"questionId":1,"value":9}]"#))
        .unwrap();
    assert_eq!(duplicated, direct);
}

#[test]
fn unknown_question_ids_do_not_change_the_result() {
    let engine = small_engine();
    let with_noise = engine
        .assess(&answers(r#"[{"questionId":99,"value":123}]"#))
        .unwrap();
    let baseline = engine.assess(&[]).unwrap();
    assert_eq!(with_noise, baseline);
}

#[test]
fn out_of_vocabulary_text_degrades_to_the_default_category() {
    let engine = small_engine();
    let unknown = engine
        .assess(&answers(r#"[{"questionId":4,"value":"Chaotic"}]"#))
        .unwrap();
    let default = engine.assess(&[]).unwrap();
    assert_eq!(unknown, default);
}

#[test]
fn identical_configuration_reproduces_identical_assessments() {
    let first = small_engine();
    let second = small_engine();
    let payload = answers(r#"[{"questionId":1,"value":7},{"questionId":2,"value":5}]"#);
    assert_eq!(
        first.assess(&payload).unwrap(),
        second.assess(&payload).unwrap()
    );
}

#[test]
fn an_adopted_model_assesses_like_the_engine_that_saved_it() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("stress_model.toml");

    let engine = small_engine();
    engine.model().save(&path).expect("model saves");

    let adopted = ScoreEngine::from_model(TrainedModel::load(&path).expect("model loads"));
    let payload = answers(r#"[{"questionId":2,"value":5.5},{"questionId":5,"value":"Never"}]"#);
    assert_eq!(
        engine.assess(&payload).unwrap(),
        adopted.assess(&payload).unwrap()
    );
}

// Full-size run matching the predictor binary's defaults: a maximally
// strained profile must come out as high stress with every contextual
// recommendation, in rule order.
#[test]
fn strained_profile_reports_high_stress_with_full_advice() {
    let engine = ScoreEngine::train(&SynthesisConfig::default(), ModelConfig::default())
        .expect("engine should fit");
    let result = engine
        .assess(&answers(
            r#"[{"questionId":1,"value":9},{"questionId":2,"value":4},
                {"questionId":3,"value":0},{"questionId":4,"value":"Poor"},
                {"questionId":5,"value":"Never"}]"#,
        ))
        .unwrap();

    assert!(
        result.score > 60,
        "expected a high-stress verdict, got {}",
        result.score
    );
    assert_eq!(
        result.recommendations,
        vec![
            recommend::BASELINE.to_string(),
            recommend::HIGH_STRESS.to_string(),
            recommend::sleep_recommendation(4.0),
            recommend::EXERCISE.to_string(),
            recommend::WORK_LIFE_BALANCE.to_string(),
            recommend::RELAXATION.to_string(),
        ]
    );
}
