use anyhow::Result;
use ourarea_services::CategoryFilter;

#[tokio::main]
async fn main() -> Result<()> {
    ourarea_core::init()?;

    let app = ourarea_core::App::new()?;
    tracing::info!("OurArea started");

    println!("OurArea - your neighborhood feed");
    println!("  Config directory: {}", app.config().config_dir.display());

    if let Some(auth) = app.auth() {
        match auth.refresh_if_needed().await {
            Ok(Some(session)) => println!("  Signed in as {}", session.user.email),
            Ok(None) => println!("  Not signed in"),
            Err(e) => tracing::warn!("Session refresh failed: {}", e),
        }
    }

    let Some(area) = app.feed().locate().await else {
        return Ok(());
    };
    println!("\nArea: {} ({:?})", area.name(), area.source);

    let page = app.feed().load_page(1).await?;
    println!("\nFeed:");
    if page.posts.is_empty() {
        println!("  No posts yet in {}", area.name());
    }
    for post in &page.posts {
        println!(
            "  [{}] {} - {} ({} likes, {} comments)",
            post.category,
            post.author.name,
            post.text,
            post.likes,
            post.comments
        );
    }
    if page.has_more {
        println!("  ...");
    }

    let today = chrono::Utc::now().date_naive();
    println!("\nServices nearby:");
    for service in app.nearby_services(CategoryFilter::All) {
        let offers = app.directory().active_offers(&service.id, today)?;
        println!(
            "  {} ({}) - {}, {} active offers",
            service.name,
            service.category,
            service.tagline,
            offers.len()
        );
    }

    Ok(())
}
