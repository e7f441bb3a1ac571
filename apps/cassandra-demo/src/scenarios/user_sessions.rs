//! Sessions that expire through TTL

use database::cassandra::CassandraContext;
use domain_sessions::{CassandraSessionRepository, NewSession, SessionService, UserSession};
use eyre::Result;
use uuid::Uuid;

const REFRESHED_TTL_SECONDS: i32 = 7_200;

fn profile_permissions(session: NewSession, edit: bool, admin: bool) -> NewSession {
    session
        .with_permission("read_profile", true)
        .with_permission("edit_profile", edit)
        .with_permission("admin_access", admin)
}

/// Three logins with 1 h, 24 h and 30 min lifetimes
pub fn sample_sessions() -> Vec<NewSession> {
    vec![
        profile_permissions(
            NewSession::new(Uuid::new_v4(), "john.doe", "192.168.1.100")
                .with_device("Chrome 100.0.4896.127 on Windows 10")
                .with_ttl(3_600),
            true,
            false,
        ),
        profile_permissions(
            NewSession::new(Uuid::new_v4(), "jane.smith", "192.168.1.101")
                .with_device("Safari 15.4 on MacOS")
                .with_ttl(86_400),
            true,
            true,
        ),
        profile_permissions(
            NewSession::new(Uuid::new_v4(), "guest.user", "192.168.1.102")
                .with_device("Firefox 99.0 on Linux")
                .with_ttl(1_800),
            false,
            false,
        ),
    ]
}

pub fn demo_session() -> NewSession {
    profile_permissions(
        NewSession::new(Uuid::new_v4(), "demo.user", "192.168.1.103")
            .with_device("Edge 100.0.1185.50 on Windows 11")
            .with_ttl(3_600),
        true,
        false,
    )
}

/// Compact duration, e.g. `1h 30m` or `45s`
pub fn format_ttl(seconds: i32) -> String {
    let seconds = seconds.max(0);
    let (hours, minutes, secs) = (seconds / 3_600, seconds % 3_600 / 60, seconds % 60);

    let parts: Vec<String> = [(hours, "h"), (minutes, "m"), (secs, "s")]
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect();

    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}

fn print_session(session: &UserSession) {
    println!("Retrieved session for {}", session.username);
    println!("Login time: {}", session.login_time);
    println!("Last activity: {}", session.last_activity);
    println!("Expires in: {}", format_ttl(session.ttl_seconds));
    println!("Permissions:");
    for (name, granted) in &session.permissions {
        println!("  {}: {}", name, granted);
    }
}

pub async fn run(context: &CassandraContext) -> Result<()> {
    let repository = CassandraSessionRepository::init(context.session()).await?;
    let service = SessionService::new(repository);

    println!("Creating sample user sessions...");
    for input in sample_sessions() {
        let session = service.login(input).await?;
        println!(
            "Created session for {} with ID: {} (TTL {})",
            session.username,
            session.session_id,
            format_ttl(session.ttl_seconds)
        );
    }

    let created = service.login(demo_session()).await?;
    let session_id = created.session_id;
    println!(
        "\nCreated session for {} with ID: {}",
        created.username, session_id
    );

    println!("\nRetrieving the session...");
    print_session(&service.get_session(session_id).await?);

    println!("\nUpdating session activity...");
    service.record_activity(session_id).await?;
    let updated = service.get_session(session_id).await?;
    println!("Login time: {}", updated.login_time);
    println!("Last activity: {} (updated)", updated.last_activity);

    let refreshed = service.refresh(session_id, REFRESHED_TTL_SECONDS).await?;
    println!(
        "Session extended, now expires at {}",
        refreshed.expires_at()
    );
    println!(
        "Can edit profile: {}, admin: {}",
        service.has_permission(&refreshed, "edit_profile"),
        service.has_permission(&refreshed, "admin_access")
    );

    println!("\nDeleting session (logout)...");
    service.logout(session_id).await?;

    println!("\nAttempting to retrieve the deleted session...");
    match service.find_session(session_id).await? {
        None => println!("Session not found (as expected)"),
        Some(_) => println!("Session was unexpectedly found"),
    }

    println!("\nNote: without an explicit logout, each session row expires on its own");
    println!("once its TTL runs out.");

    Ok(())
}
