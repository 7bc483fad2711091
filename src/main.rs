//! PixVault - CLI
//!
//! Command-line interface over the vault API.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use pixvault::{ImageVaultApi, UploadRequest, VaultError};

#[derive(Parser)]
#[command(name = "pixvault")]
#[command(version = pixvault::VERSION)]
#[command(about = "Password-protected encrypted image vault")]
struct Cli {
    /// Vault database path
    #[arg(short, long, default_value = "./pixvault.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt an image and store it
    Upload {
        /// Image file
        file: PathBuf,

        /// Display name (defaults to the file name)
        #[arg(short, long)]
        name: Option<String>,

        /// Password
        #[arg(short, long)]
        password: String,

        /// Cipher mode: ECB, CBC, CFB, OFB or CTR (default CBC)
        #[arg(short, long)]
        mode: Option<String>,
    },

    /// List stored images
    List {
        /// Print the gallery as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one record's encrypted payload (base64)
    Show {
        /// Image ID
        id: String,
    },

    /// Write the raw encrypted bytes to a file
    Export {
        /// Image ID
        id: String,

        /// Output path
        output: PathBuf,
    },

    /// Decrypt an image back to its original bytes
    Decrypt {
        /// Image ID
        id: String,

        /// Password
        #[arg(short, long)]
        password: String,

        /// Output path
        output: PathBuf,
    },

    /// Delete an image
    Delete {
        /// Image ID
        id: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        // Password failures print their collapsed public message; nothing
        // else gets the treatment
        match e.downcast_ref::<VaultError>() {
            Some(ve) if ve.is_password_failure() => eprintln!("Error: {}", ve.public_message()),
            _ => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let api = ImageVaultApi::open(&cli.db)
        .with_context(|| format!("opening vault at {}", cli.db.display()))?;

    match cli.command {
        Commands::Upload {
            file,
            name,
            password,
            mode,
        } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("reading {}", file.display()))?;

            let original_name = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string();
            let name = name.unwrap_or_else(|| original_name.clone());

            let receipt = api.upload(UploadRequest {
                name: &name,
                original_name: &original_name,
                password: &password,
                mode: mode.as_deref(),
                bytes: &bytes,
            })?;

            println!("🔐 Image encrypted and stored");
            println!("   ID:     {}", receipt.id);
            println!("   Name:   {}", receipt.name);
            println!("   Mode:   {}", receipt.cipher_mode);
            println!("   MIME:   {}", receipt.mime_type);
            println!("   Bytes:  {} plaintext → {} ciphertext", bytes.len(), receipt.ciphertext_len);
        }

        Commands::List { json } => {
            let gallery = api.gallery()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&gallery)?);
            } else if gallery.is_empty() {
                println!("📭 No images in vault");
            } else {
                println!("🖼  Images in vault ({}):", gallery.len());
                println!("{:-<72}", "");
                for image in gallery {
                    println!(
                        "{}  {}  {}  ({}, {})",
                        image.id, image.cipher_mode, image.name, image.mime_type, image.created_at
                    );
                }
            }
        }

        Commands::Show { id } => {
            let view = api.encrypted_view(&id)?;
            println!("Original name: {}", view.original_name);
            println!("MIME type:     {}", view.mime_type);
            println!("Ciphertext (base64):");
            println!("{}", view.ciphertext);
        }

        Commands::Export { id, output } => {
            let (name, bytes) = api.export_encrypted(&id)?;
            std::fs::write(&output, &bytes)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("📦 Exported encrypted '{}' to {} ({} bytes)", name, output.display(), bytes.len());
        }

        Commands::Decrypt { id, password, output } => {
            let image = api.decrypt(&id, &password)?;
            std::fs::write(&output, &image.bytes)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("🔓 Decrypted '{}' ({}, {} mode) to {}",
                image.original_name, image.mime_type, image.cipher_mode, output.display());
        }

        Commands::Delete { id } => {
            api.delete(&id)?;
            println!("🗑  Image {} deleted", id);
        }
    }

    Ok(())
}
