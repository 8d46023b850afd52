use super::GlobalOptions;
use anyhow::Result;
use mindsage_application::{ActorFactory, ChannelBuilder, normalize};
use mindsage_core::identity::Credential;
use mindsage_core::therapy::TherapyService;
use mindsage_interaction::{HttpActorBinder, HttpChannelTransport};
use std::sync::Arc;

/// Builds a channel as the anonymous principal and tries one read-only call.
pub async fn run(options: &GlobalOptions) -> Result<()> {
    let config = options.load_config()?;
    println!("Endpoint: {} ({:?})", config.host(), config.endpoint_class);

    let builder = ChannelBuilder::new(config, Arc::new(HttpChannelTransport::new()));
    let channel = builder.build(Credential::anonymous()).await;
    println!("Trust:    {:?}", channel.trust().status());

    let binding = ActorFactory::new(Arc::new(HttpActorBinder::new())).bind(&channel);
    println!("Bind:     {}", binding.path());

    let Some(actor) = binding.actor() else {
        anyhow::bail!("Could not bind the therapy service: {:?}", binding);
    };

    let users = normalize("Get total users", actor.get_total_users().await);
    match users.into_result() {
        Ok(count) => println!("Users:    {}", count),
        Err(e) => anyhow::bail!("Service call failed: {}", e),
    }
    Ok(())
}
