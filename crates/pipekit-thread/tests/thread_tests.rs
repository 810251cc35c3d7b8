//! Thread assembly tests

use pipekit_thread::{
    EXAMPLE_ASSISTANT_NAME, EXAMPLE_USER_NAME, Message, Pipe, PipeMemory, PipeVariable, Role,
    SimilarChunk, THREAD_ERROR_MESSAGE, ThreadError, Variables, build_thread,
};

fn pipe(messages: Vec<Message>) -> Pipe {
    Pipe {
        name: "support-agent".to_string(),
        messages,
        ..Pipe::default()
    }
}

fn variables(pairs: &[(&str, &str)]) -> Variables {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[test]
fn test_thread_order_system_examples_then_caller() {
    let pipe = pipe(vec![
        Message::system("You are a support agent."),
        Message::system("How do I reset?").with_name(EXAMPLE_USER_NAME),
        Message::system("Use the reset link.").with_name(EXAMPLE_ASSISTANT_NAME),
        Message::system("Can I change email?").with_name(EXAMPLE_USER_NAME),
        Message::system("Yes, in settings.").with_name(EXAMPLE_ASSISTANT_NAME),
    ]);

    let thread = build_thread(&pipe, &[Message::user("hi")], None, None).expect("thread");

    let contents: Vec<&str> = thread.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(
        contents,
        vec![
            "You are a support agent.",
            "How do I reset?",
            "Use the reset link.",
            "Can I change email?",
            "Yes, in settings.",
            "hi",
        ]
    );
    assert_eq!(thread[0].role, Role::System);
    assert_eq!(thread[0].name, None);
    assert_eq!(thread[1].name.as_deref(), Some(EXAMPLE_USER_NAME));
    assert_eq!(thread[5].role, Role::User);
}

#[test]
fn test_variables_substituted_and_unknown_kept() {
    let pipe = pipe(vec![Message::system("Greet {{name}}. Mention {{missing}}.")]);
    let vars = variables(&[("name", "Ada")]);

    let thread = build_thread(&pipe, &[], None, Some(&vars)).expect("thread");
    assert_eq!(thread.len(), 1);
    assert_eq!(thread[0].content, "Greet Ada. Mention {{missing}}.");
}

#[test]
fn test_variables_apply_to_caller_messages_and_pipe_defaults() {
    let mut pipe = pipe(vec![Message::system("Answer in {{ language }}.")]);
    pipe.variables = vec![PipeVariable {
        name: "language".to_string(),
        value: "English".to_string(),
    }];

    let thread = build_thread(
        &pipe,
        &[Message::user("Explain {{topic}}")],
        None,
        Some(&variables(&[("topic", "lifetimes")])),
    )
    .expect("thread");

    assert_eq!(thread[0].content, "Answer in English.");
    assert_eq!(thread[1].content, "Explain lifetimes");
}

#[test]
fn test_memory_context_rendered_into_system_prompt() {
    let mut pipe = pipe(vec![Message::system("Use this:\n{{context}}")]);
    pipe.memory = vec![PipeMemory {
        name: "docs".to_string(),
    }];
    let chunks = vec![SimilarChunk::new("Pipes run prompts.").with_document("pipes.md")];

    let thread = build_thread(&pipe, &[Message::user("What is a pipe?")], Some(&chunks), None)
        .expect("thread");

    assert_eq!(
        thread[0].content,
        "Use this:\nPipes run prompts.\n\nSource: pipes.md [1]"
    );
}

#[test]
fn test_caller_messages_pass_through_unvalidated() {
    let pipe = pipe(Vec::new());
    let caller = vec![
        Message::new(Role::Tool, "tool output"),
        Message::system("late system message"),
    ];

    let thread = build_thread(&pipe, &caller, None, None).expect("thread");
    assert_eq!(thread, caller);
}

fn assert_internal(result: Result<Vec<Message>, ThreadError>) {
    let Err(error) = result else {
        panic!("expected thread error");
    };
    assert_eq!(error.code(), "INTERNAL_SERVER_ERROR");
    let message = error.to_string();
    assert!(message.starts_with(THREAD_ERROR_MESSAGE), "got: {message}");
    assert!(message.contains("(ref: "), "got: {message}");
}

#[test]
fn test_two_primary_system_prompts_fail_opaquely() {
    let pipe = pipe(vec![Message::system("One"), Message::system("Two")]);
    assert_internal(build_thread(&pipe, &[], None, None));
}

#[test]
fn test_blank_model_fails_opaquely() {
    let mut pipe = pipe(vec![Message::system("Prompt")]);
    pipe.model = "openai:  ".to_string();
    assert_internal(build_thread(&pipe, &[], None, None));
}

#[test]
fn test_tool_few_shot_fails_opaquely() {
    let pipe = pipe(vec![Message::new(Role::Tool, "{}")]);
    let result = build_thread(&pipe, &[], None, None);

    let Err(ThreadError::Internal { message, .. }) = &result else {
        panic!("expected thread error");
    };
    assert!(!message.contains("tool"), "cause must not leak: {message}");
    assert_internal(result);
}
