//! Commands that talk to the running editor: `-R`, `-M`, `-U`, `-K`, `-I`.

use zle_core::{Status, ZleError, ZleResult};

use crate::session::{RefreshRequest, Session};
use crate::Zle;

fn require_active(session: &dyn Session) -> ZleResult<()> {
    if session.is_active() {
        Ok(())
    } else {
        Err(ZleError::NotInWidgetFunction)
    }
}

impl Zle {
    /// Redraw, optionally with a new status line and a list of strings.
    ///
    /// Fails silently when no session is active.
    pub fn refresh(&mut self, session: &mut dyn Session, args: &[String], clear: bool) -> Status {
        if !session.is_active() {
            return Status::Failure;
        }
        let mut request = RefreshRequest::default();
        if let Some((status, list)) = args.split_first() {
            if !status.is_empty() {
                request.status = Some(status.clone());
            }
            request.list = list.to_vec();
            request.clear_list = clear && list.is_empty();
        } else {
            request.clear_list = clear;
        }
        session.refresh(request);
        Status::Success
    }

    /// Show `message` below the edit line.
    pub fn message(&mut self, session: &mut dyn Session, message: &str) -> ZleResult<()> {
        require_active(session)?;
        session.show_message(message);
        Ok(())
    }

    /// Push `input` back so it is read next, in order.
    pub fn unget(&mut self, session: &mut dyn Session, input: &str) -> ZleResult<()> {
        require_active(session)?;
        for &byte in input.as_bytes().iter().rev() {
            session.unget_byte(byte);
        }
        Ok(())
    }

    /// Select the keymap `name`.
    pub fn keymap(&mut self, session: &mut dyn Session, name: &str) -> ZleResult<()> {
        require_active(session)?;
        session.select_keymap(name)
    }

    /// Invalidate the display. Succeeds only if a session is active.
    pub fn invalidate(&mut self, session: &mut dyn Session) -> Status {
        if !session.is_active() {
            return Status::Failure;
        }
        if !session.is_trashed() {
            session.trash();
        }
        Status::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{args, capture};
    use crate::options::Options;
    use crate::session::MockSession;
    use mockall::predicate::eq;
    use mockall::Sequence;

    fn inactive() -> MockSession {
        let mut session = MockSession::new();
        session.expect_is_active().return_const(false);
        session
    }

    #[test]
    fn test_message_requires_session() {
        let (mut zle, _out, err) = capture();
        let mut session = inactive();
        session.expect_show_message().never();

        let status = zle.run(&mut session, "zle", &args(&["hi"]), &Options::from_flags("M"));
        assert_eq!(status, Status::Failure);
        assert_eq!(err.contents(), "zle: can only be called from widget function\n");
    }

    #[test]
    fn test_message_shown() {
        let mut zle = Zle::new();
        let mut session = MockSession::new();
        session.expect_is_active().return_const(true);
        session
            .expect_show_message()
            .with(eq("hello"))
            .times(1)
            .return_const(());

        zle.message(&mut session, "hello").unwrap();
    }

    #[test]
    fn test_unget_pushes_bytes_in_reverse() {
        let mut zle = Zle::new();
        let mut session = MockSession::new();
        let mut seq = Sequence::new();
        session.expect_is_active().return_const(true);
        for byte in [b'c', b'b', b'a'] {
            session
                .expect_unget_byte()
                .with(eq(byte))
                .times(1)
                .in_sequence(&mut seq)
                .return_const(());
        }

        zle.unget(&mut session, "abc").unwrap();
    }

    #[test]
    fn test_keymap_selects() {
        let mut zle = Zle::new();
        let mut session = MockSession::new();
        session.expect_is_active().return_const(true);
        session
            .expect_select_keymap()
            .with(eq("vicmd"))
            .times(1)
            .returning(|_| Ok(()));
        session
            .expect_select_keymap()
            .with(eq("nope"))
            .returning(|name| Err(ZleError::NoSuchKeymap(name.to_string())));

        zle.keymap(&mut session, "vicmd").unwrap();
        assert_eq!(
            zle.keymap(&mut session, "nope"),
            Err(ZleError::NoSuchKeymap("nope".to_string()))
        );
    }

    #[test]
    fn test_invalidate() {
        let mut zle = Zle::new();

        let mut session = inactive();
        session.expect_trash().never();
        assert_eq!(zle.invalidate(&mut session), Status::Failure);

        let mut session = MockSession::new();
        session.expect_is_active().return_const(true);
        session.expect_is_trashed().return_const(false);
        session.expect_trash().times(1).return_const(());
        assert_eq!(zle.invalidate(&mut session), Status::Success);

        let mut session = MockSession::new();
        session.expect_is_active().return_const(true);
        session.expect_is_trashed().return_const(true);
        session.expect_trash().never();
        assert_eq!(zle.invalidate(&mut session), Status::Success);
    }

    #[test]
    fn test_refresh_requests() {
        let mut zle = Zle::new();

        let mut session = inactive();
        session.expect_refresh().never();
        assert_eq!(zle.refresh(&mut session, &[], false), Status::Failure);

        let mut session = MockSession::new();
        session.expect_is_active().return_const(true);
        session
            .expect_refresh()
            .with(eq(RefreshRequest {
                status: Some("status".to_string()),
                list: args(&["one", "two"]),
                clear_list: false,
            }))
            .times(1)
            .return_const(());
        session
            .expect_refresh()
            .with(eq(RefreshRequest {
                status: None,
                list: Vec::new(),
                clear_list: true,
            }))
            .times(2)
            .return_const(());

        let status = zle.refresh(&mut session, &args(&["status", "one", "two"]), true);
        assert_eq!(status, Status::Success);
        assert_eq!(zle.refresh(&mut session, &[], true), Status::Success);
        assert_eq!(zle.refresh(&mut session, &args(&[""]), true), Status::Success);
    }
}
