//! Interactive terminal workflow: connect, review VLANs, optionally add
//! one and attach it to a vNIC template. Mirrors the web flow but runs as
//! one linear session.

use anyhow::Context as _;
use dialoguer::{Confirm, Input, Password};

use crate::config::Config;
use crate::ucs::{BindOutcome, UcsSession};

pub async fn run(config: &Config) -> anyhow::Result<()> {
    let host = text_or_prompt(&config.ucs_host, "UCS Manager IP address")?;
    let username = text_or_prompt(&config.ucs_username, "Username")?;
    let password = if config.ucs_password.is_empty() {
        Password::new().with_prompt("Password").interact()?
    } else {
        config.ucs_password.clone()
    };

    let session = UcsSession::login(config, &host, &username, &password)
        .await
        .context("could not connect to UCS Manager")?;

    println!();
    println!("Cisco UCS Manager VLAN Management");
    println!();

    println!("Current VLANs:");
    for (name, id) in session.list_vlans().await? {
        println!("- {} ({})", name, id);
    }
    println!();

    if Confirm::new()
        .with_prompt("Would you like to add a new VLAN?")
        .interact()?
    {
        let vlan_name: String = Input::new().with_prompt("Enter the VLAN name").interact_text()?;
        let vlan_id: String = Input::new().with_prompt("Enter the VLAN ID").interact_text()?;

        session
            .create_vlan(&vlan_name, &vlan_id)
            .await
            .context("VLAN creation failed")?;

        println!();
        println!("The following VLAN has been created:");
        for (name, id) in session.list_vlans().await? {
            if name.contains(&vlan_name) {
                println!("- {} ({})", name, id);
            }
        }

        println!();
        println!("Current vNIC templates:");
        for name in session.list_vnic_templates().await? {
            println!("- {}", name);
        }
        println!();

        if Confirm::new()
            .with_prompt(format!(
                "Would you like to add the \"{}\" VLAN to a vNIC template?",
                vlan_name
            ))
            .interact()?
        {
            let vnic_name: String = Input::new()
                .with_prompt("vNIC template name")
                .interact_text()?;

            let orgs = session.list_organizations().await?;
            match session
                .bind_vlan_to_vnic(&vnic_name, &vlan_name, &orgs)
                .await
                .context("VLAN bind failed")?
            {
                BindOutcome::Bound { .. } => {
                    println!(
                        "The \"{}\" VLAN has been added to the \"{}\" vNIC template.",
                        vlan_name, vnic_name
                    );
                }
                BindOutcome::TemplateNotFound => {
                    println!("No vNIC template named \"{}\" was found; nothing changed.", vnic_name);
                }
            }
        }
    }

    session.logout().await?;
    Ok(())
}

fn text_or_prompt(configured: &str, prompt: &str) -> anyhow::Result<String> {
    if !configured.is_empty() {
        return Ok(configured.to_string());
    }
    Ok(Input::new().with_prompt(prompt).interact_text()?)
}
