use crate::infra::load_answers;
use clap::Args;
use nis2_scope::error::AppError;
use nis2_scope::questionnaire::{
    section_title, AnswerSet, Assessment, AssessmentEngine, QuestionGraph, QuestionId,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// JSON object mapping question ids to answers
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Print the full assessment as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct QuestionsArgs {
    /// JSON object mapping question ids to answers
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Question currently shown; reports where navigation lands after the answers change
    #[arg(long, value_parser = crate::infra::parse_question_id)]
    pub(crate) current: Option<QuestionId>,
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let answers = load_answers(&args.answers)?;
    let assessment = AssessmentEngine::new().assess(&answers);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
    } else {
        for line in render_assessment(&assessment) {
            println!("{line}");
        }
    }
    Ok(())
}

pub(crate) fn run_questions(args: QuestionsArgs) -> Result<(), AppError> {
    let answers = load_answers(&args.answers)?;
    for line in render_questions(&QuestionGraph::new(), &answers, args.current) {
        println!("{line}");
    }
    Ok(())
}

fn render_assessment(assessment: &Assessment) -> Vec<String> {
    let mut lines = vec![
        format!("Outcome: {}", assessment.outcome.label()),
        assessment.message.clone(),
        assessment.details.clone(),
    ];

    if !assessment.findings.is_empty() {
        lines.push("Matched rules:".to_string());
        for finding in &assessment.findings {
            match finding.question {
                Some(question) => lines.push(format!("  - {} ({question})", finding.note)),
                None => lines.push(format!("  - {}", finding.note)),
            }
        }
    }

    if !assessment.uncertainty.is_empty() {
        lines.push("Open points:".to_string());
        for reason in &assessment.uncertainty {
            lines.push(format!("  - {}", reason.summary()));
        }
    }

    lines
}

fn render_questions(
    graph: &QuestionGraph,
    answers: &AnswerSet,
    current: Option<QuestionId>,
) -> Vec<String> {
    let visible = graph.visible_questions(answers);
    let position = current.and_then(|id| graph.reclamp(id, &visible));

    let mut lines = Vec::with_capacity(visible.len() + 2);
    let mut section = None;
    for (index, question) in visible.iter().enumerate() {
        if section != Some(question.section) {
            section = Some(question.section);
            let title = section_title(question.section).unwrap_or_default();
            lines.push(format!("{}. {title}", question.section));
        }
        let marker = if position == Some(index) {
            '>'
        } else if answers.contains(question.id) {
            'x'
        } else {
            ' '
        };
        lines.push(format!("  [{marker}] {}: {}", question.id, question.prompt));
    }

    let pending = graph.pending(answers).len();
    if pending == 0 {
        lines.push("All visible questions answered.".to_string());
    } else {
        lines.push(format!("{pending} visible question(s) unanswered."));
    }
    lines
}
