use super::{GlobalOptions, format_time, into_anyhow, signed_in_manager};
use anyhow::Result;

pub async fn register(options: &GlobalOptions, username: &str) -> Result<()> {
    let manager = signed_in_manager(options).await?;
    let profile = into_anyhow(manager.register_user(username).await)?;
    println!("Registered {} ({})", profile.username, profile.principal);
    Ok(())
}

pub async fn history(options: &GlobalOptions) -> Result<()> {
    let manager = signed_in_manager(options).await?;
    let sessions = into_anyhow(manager.get_user_sessions().await)?;

    if sessions.is_empty() {
        println!("No sessions yet");
        return Ok(());
    }

    for session in sessions {
        let when = format_time(session.timestamp_utc());
        println!(
            "{}  {:<12} {:>3} min  stress {} -> {}  {}",
            when,
            session.session_type,
            session.duration_minutes,
            session.stress_before,
            session.stress_after,
            session.voice_metrics.emotion
        );
    }
    Ok(())
}

pub async fn report(options: &GlobalOptions) -> Result<()> {
    let manager = signed_in_manager(options).await?;
    let report = into_anyhow(manager.generate_progress_report().await)?;

    println!("Sessions:              {}", report.total_sessions);
    println!("Avg stress reduction:  {:.2}", report.avg_stress_reduction);
    println!("Trend:                 {}", report.trend);
    println!("Generated:             {}", format_time(report.generated_at_utc()));
    for recommendation in &report.recommendations {
        println!("  - {}", recommendation);
    }
    Ok(())
}

pub async fn reflect(options: &GlobalOptions, thought: &str) -> Result<()> {
    let manager = signed_in_manager(options).await?;
    let reflection = into_anyhow(manager.get_cbt_reflection(thought).await)?;
    println!("{}", reflection);
    Ok(())
}
