use anyhow::Result;
use clap::Subcommand;
use solvesphere_core::secret::CredentialGate;
use solvesphere_infrastructure::FileCredentialGate;

#[derive(Subcommand)]
pub enum CredentialAction {
    /// Report whether a usable API credential is configured
    Status,
    /// Create the credential template file and print its path
    Init,
}

pub async fn run(action: CredentialAction) -> Result<()> {
    let gate = FileCredentialGate::new()?;

    match action {
        CredentialAction::Status => {
            if gate.has_credential().await {
                println!("API credential configured.");
            } else {
                println!("No API credential configured. Run `solvesphere credential init`.");
            }
        }
        CredentialAction::Init => {
            let path = gate.open_credential_picker().await?;
            println!("Add your Gemini API key to: {}", path.display());
        }
    }

    Ok(())
}
