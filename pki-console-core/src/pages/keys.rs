//! Private-key page.

use pki_console_client::{Command, Payload};

use crate::pages::page::{PageResource, ResourcePage};
use crate::types::PrivateKey;

/// The private-key page needs no orchestration beyond the generic machine.
pub type KeyPage = ResourcePage<PrivateKey>;

impl PageResource for PrivateKey {
    const KIND: &'static str = "private key";

    fn name(&self) -> &str {
        &self.name
    }

    fn draft() -> Self {
        Self::draft()
    }

    fn list_command() -> Command {
        Command::ListKeys
    }

    fn create_command(&self) -> Command {
        Command::CreateKey {
            name: self.name.clone(),
            algorithm: self.algorithm,
            size: self.size,
            cipher: self.cipher,
            password: self.password.clone(),
        }
    }

    fn remove_command(name: &str) -> Command {
        Command::RemoveKey {
            name: name.to_string(),
        }
    }

    fn wipe_command() -> Command {
        Command::WipeKeys
    }

    fn from_payload(payload: Payload) -> Option<Vec<Self>> {
        match payload {
            Payload::Keys(entries) => Some(entries.into_iter().map(Into::into).collect()),
            _ => None,
        }
    }

    fn on_created(&mut self) {
        // The daemon returns the generated material, not the record; the
        // password's only trace in the table is the encrypted flag.
        self.encrypted = self.has_password();
        self.password = None;
    }
}
