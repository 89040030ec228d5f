use std::sync::Mutex;

use futures::future::BoxFuture;

use encore::crew::prompt::build_task_prompt;
use encore::crew::{CrewEvent, TaskAssignment, TaskExecutor};
use encore::error::AgentError;
use encore::planner::{PlanForm, build_crew};

// ─── Helper ───────────────────────────────────────────────────────────

/// Captures the prompt each agent would receive instead of calling a model.
#[derive(Default)]
struct PromptRecorder {
    prompts: Mutex<Vec<(String, String)>>,
}

impl TaskExecutor for PromptRecorder {
    fn execute<'a>(
        &'a self,
        assignment: TaskAssignment<'a>,
    ) -> BoxFuture<'a, Result<String, AgentError>> {
        Box::pin(async move {
            let prompt = build_task_prompt(assignment.task, &assignment.context);
            self.prompts
                .lock()
                .unwrap()
                .push((assignment.agent.role.clone(), prompt));
            Ok(format!("<<{} result>>", assignment.agent.role))
        })
    }
}

// ============================================================
// End-to-end crew run with a recording executor
// ============================================================

#[tokio::test]
async fn full_plan_runs_four_tasks_with_documented_context() {
    let request = PlanForm::new("Paper Planes", "dreamy bedroom pop", "Clairo")
        .validate()
        .unwrap();
    let crew = build_crew(&request);
    let recorder = PromptRecorder::default();

    let output = crew.kickoff(&recorder, None).await.unwrap();

    let prompts = recorder.prompts.lock().unwrap().clone();
    let roles: Vec<&str> = prompts.iter().map(|(r, _)| r.as_str()).collect();
    assert_eq!(
        roles,
        ["Music Marketing Strategist", "Content Creator", "Social Scheduler", "Reviewer"]
    );

    // Strategy: no context.
    assert!(prompts[0].1.contains("'Paper Planes' with style 'dreamy bedroom pop'"));
    assert!(!prompts[0].1.contains("## Context"));

    // Content: sees the strategy only, and names the channel.
    assert!(prompts[1].1.contains("Analyze the YouTube channel 'Clairo'"));
    assert!(prompts[1].1.contains("<<Music Marketing Strategist result>>"));

    // Schedule: sees content only.
    assert!(prompts[2].1.contains("<<Content Creator result>>"));
    assert!(!prompts[2].1.contains("<<Music Marketing Strategist result>>"));

    // Review: sees all three.
    for role in ["Music Marketing Strategist", "Content Creator", "Social Scheduler"] {
        assert!(prompts[3].1.contains(&format!("<<{role} result>>")));
    }

    assert_eq!(output.raw, "<<Reviewer result>>");
    assert_eq!(output.tasks_output.len(), 4);
}

#[tokio::test]
async fn plan_without_channel_never_mentions_one() {
    let request = PlanForm::new("Paper Planes", "dreamy", "").validate().unwrap();
    let crew = build_crew(&request);
    let recorder = PromptRecorder::default();

    crew.kickoff(&recorder, None).await.unwrap();

    let prompts = recorder.prompts.lock().unwrap().clone();
    assert!(prompts[1].1.contains("Use general trending video insights in the music industry."));
    assert!(!prompts[1].1.contains("YouTube channel '"));
}

#[tokio::test]
async fn progress_events_follow_task_order() {
    let request = PlanForm::new("Paper Planes", "dreamy", "").validate().unwrap();
    let crew = build_crew(&request);
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    crew.kickoff(&PromptRecorder::default(), Some(tx)).await.unwrap();

    let mut completed = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let CrewEvent::TaskCompleted { name, .. } = event {
            completed.push(name);
        }
    }
    assert_eq!(
        completed,
        [
            "Creating Marketing Strategy...",
            "Generating Content Ideas...",
            "Determining Optimal Posting Schedule...",
            "Reviewing and Refining Output...",
        ]
    );
}
