//! `zle -F`: install, remove and list descriptor watches.

use zle_core::{Status, ZleError, ZleResult};

use crate::options::Options;
use crate::quote::quote;
use crate::watch::parse_fd;
use crate::Zle;

impl Zle {
    /// Call `handler` whenever `fd` becomes readable, replacing any
    /// handler already installed for it.
    pub fn watch_fd(&mut self, fd: i32, handler: &str) {
        self.watches.set(fd, handler);
    }

    /// Stop watching `fd`.
    pub fn unwatch_fd(&mut self, fd: i32) -> ZleResult<()> {
        if self.watches.remove(fd) {
            Ok(())
        } else {
            Err(ZleError::DescriptorNotRegistered(fd))
        }
    }

    pub(crate) fn fd_command(
        &mut self,
        name: &str,
        args: &[String],
        ops: &Options,
    ) -> ZleResult<Status> {
        let fd = match args.first() {
            Some(arg) => {
                Some(parse_fd(arg).ok_or_else(|| ZleError::BadDescriptor(arg.clone()))?)
            }
            None => None,
        };

        match (fd, args.get(1)) {
            (_, Some(_)) if ops.is_set('L') => Err(ZleError::TooManyArguments("FL".to_string())),
            (Some(fd), Some(handler)) => {
                self.watch_fd(fd, handler);
                Ok(Status::Success)
            }
            (Some(fd), None) if !ops.is_set('L') => {
                self.unwatch_fd(fd)?;
                Ok(Status::Success)
            }
            (fd, _) => {
                let lines: Vec<String> = self
                    .watches
                    .entries()
                    .iter()
                    .filter(|e| fd.map_or(true, |fd| e.fd == fd))
                    .map(|e| format!("{} -F {} {}", name, e.fd, quote(&e.handler)))
                    .collect();
                let found = !lines.is_empty();
                for line in lines {
                    self.print(&line);
                }
                Ok(Status::from(fd.is_none() || found))
            }
        }
    }
}
