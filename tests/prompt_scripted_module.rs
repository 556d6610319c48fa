use modconf::prompt::{
    parse_script, MenuChoice, PromptBackend, PromptOutcome, PromptRecord, ScriptedAnswer,
    ScriptedBackend,
};

#[test]
fn prompt_scripted_module_parses_answer_tokens() {
    let answers = parse_script("choose:Modules; choose:Weather ;text:Tashkent;yes;No;;cancel")
        .expect("parse script");
    assert_eq!(
        answers,
        vec![
            ScriptedAnswer::Choose("Modules".to_string()),
            ScriptedAnswer::Choose("Weather".to_string()),
            ScriptedAnswer::Text("Tashkent".to_string()),
            ScriptedAnswer::Yes,
            ScriptedAnswer::No,
            ScriptedAnswer::Cancel,
        ]
    );

    let err = parse_script("choose:Modules;maybe").expect_err("invalid token");
    assert!(err.contains("`maybe`"));
}

#[test]
fn prompt_scripted_module_mismatched_or_missing_answers_cancel() {
    let mut backend = ScriptedBackend::new([ScriptedAnswer::Text("x".to_string())]);
    let choices = [MenuChoice::new("a", "first")];

    assert_eq!(backend.menu("Menu", &choices), PromptOutcome::Cancelled);
    assert_eq!(backend.inputbox("query"), PromptOutcome::Cancelled);
    assert_eq!(backend.yesno("sure?"), PromptOutcome::Cancelled);
    assert_eq!(backend.remaining(), 0);
}

#[test]
fn prompt_scripted_module_records_transcript() {
    let mut backend = ScriptedBackend::new([
        ScriptedAnswer::Choose("a".to_string()),
        ScriptedAnswer::Yes,
    ]);
    backend.set_background_title("Configuration for p");
    let choices = [MenuChoice::new("a", "first"), MenuChoice::new("b", "second")];

    assert_eq!(
        backend.menu("Menu", &choices),
        PromptOutcome::Ok("a".to_string())
    );
    backend.msgbox("done");
    assert!(backend.yesno("sure?").is_ok());

    assert_eq!(
        backend.transcript(),
        &[
            PromptRecord::Title("Configuration for p".to_string()),
            PromptRecord::Menu {
                title: "Menu".to_string(),
                tags: vec!["a".to_string(), "b".to_string()],
            },
            PromptRecord::Message("done".to_string()),
            PromptRecord::YesNo {
                question: "sure?".to_string()
            },
        ]
    );
}
