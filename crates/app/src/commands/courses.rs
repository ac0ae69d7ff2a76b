use quest_core::model::{LanguageId, ModuleId, PathNodeKind, PathNodeStatus};
use rust_i18n::t;

use super::Context;

pub async fn languages(ctx: &Context) -> anyhow::Result<()> {
    let languages = ctx.services.courses().languages(&ctx.session).await?;
    if languages.is_empty() {
        println!("{}", t!("courses.none"));
    }
    for language in languages {
        let description = language.description.unwrap_or_default();
        println!("{:>4}  {:<16} {description}", language.id.value(), language.name);
    }
    Ok(())
}

pub async fn modules(ctx: &Context, language: LanguageId) -> anyhow::Result<()> {
    let modules = ctx
        .services
        .courses()
        .modules(&ctx.session, language)
        .await?;
    if modules.is_empty() {
        println!("{}", t!("courses.no_modules"));
    }
    for module in modules {
        println!("{:>4}  {}", module.id.value(), module.title);
        if let Some(description) = module.description.filter(|d| !d.trim().is_empty()) {
            println!("      {description}");
        }
    }
    Ok(())
}

pub async fn lessons(ctx: &Context, module: ModuleId) -> anyhow::Result<()> {
    let (path, _) = ctx
        .services
        .courses()
        .course_path(&ctx.session, module)
        .await?;
    if path.nodes().is_empty() {
        println!("{}", t!("courses.no_lessons"));
    }
    for node in path.nodes() {
        let status = match node.status {
            PathNodeStatus::Completed => "✔",
            PathNodeStatus::Current => "▶",
            PathNodeStatus::Locked => "🔒",
        };
        let label = match node.kind {
            PathNodeKind::Exam => t!("courses.exam", title = node.title),
            PathNodeKind::Lesson => node.title.as_str().into(),
        };
        println!("{status} {:>4}  {label}", node.lesson_id.value());
    }
    Ok(())
}
