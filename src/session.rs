use crate::trajectory::Landing;
use chrono::{DateTime, Local};

pub(crate) const USERNAME_MAX: usize = 32;

/// Form state for one sitting: who is "logging in" and what the shots spelled.
#[derive(Clone, Debug, Default)]
pub(crate) struct Session {
    username: String,
    password: String,
    last_letter: Option<char>,
    show_password: bool,
}

/// What the login button hands back. Nothing is checked or sent anywhere.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LoginReport {
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) at: DateTime<Local>,
}

impl Session {
    pub(crate) fn new(show_password: bool) -> Self {
        Self {
            show_password,
            ..Self::default()
        }
    }

    pub(crate) fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    pub(crate) fn last_letter(&self) -> Option<char> {
        self.last_letter
    }

    pub(crate) fn show_password(&self) -> bool {
        self.show_password
    }

    /// Password as it should appear in the form.
    pub(crate) fn password_display(&self) -> String {
        if self.show_password {
            self.password.clone()
        } else {
            "*".repeat(self.password.chars().count())
        }
    }

    pub(crate) fn toggle_password_visibility(&mut self) {
        self.show_password = !self.show_password;
    }

    pub(crate) fn push_username_char(&mut self, ch: char) {
        let printable = ch.is_ascii_graphic() || ch == ' ';
        if printable && self.username.len() < USERNAME_MAX {
            self.username.push(ch);
        }
    }

    pub(crate) fn pop_username_char(&mut self) {
        self.username.pop();
    }

    pub(crate) fn forget_last_letter(&mut self) {
        self.last_letter = None;
    }

    pub(crate) fn record_landing(&mut self, landing: Landing) {
        self.last_letter = landing.letter();
        if let Some(c) = self.last_letter {
            self.password.push(c);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.password.clear();
        self.last_letter = None;
    }

    pub(crate) fn login(&self) -> LoginReport {
        LoginReport {
            username: self.username.clone(),
            password: self.password.clone(),
            at: Local::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landings_append_letters_and_misses_do_not() {
        let mut s = Session::new(false);
        s.record_landing(Landing::Letter('h'));
        s.record_landing(Landing::Letter('i'));
        assert_eq!(s.password(), "hi");
        assert_eq!(s.last_letter(), Some('i'));

        s.record_landing(Landing::OffTarget);
        assert_eq!(s.password(), "hi");
        assert_eq!(s.last_letter(), None);
    }

    #[test]
    fn clear_twice_is_the_same_as_once() {
        let mut s = Session::new(false);
        s.record_landing(Landing::Letter('q'));
        s.clear();
        let once = (s.password().to_string(), s.last_letter());
        s.clear();
        assert_eq!((s.password().to_string(), s.last_letter()), once);
        assert_eq!(once, (String::new(), None));
    }

    #[test]
    fn password_is_masked_until_shown() {
        let mut s = Session::new(false);
        s.record_landing(Landing::Letter('a'));
        s.record_landing(Landing::Letter('b'));
        assert_eq!(s.password_display(), "**");
        s.toggle_password_visibility();
        assert_eq!(s.password_display(), "ab");
    }

    #[test]
    fn username_editing_filters_and_caps() {
        let mut s = Session::new(false);
        for ch in "ada\u{7}\tlovelace".chars() {
            s.push_username_char(ch);
        }
        assert_eq!(s.username(), "adalovelace");
        s.pop_username_char();
        assert_eq!(s.username(), "adalovelac");
        for _ in 0..100 {
            s.push_username_char('x');
        }
        assert_eq!(s.username().len(), USERNAME_MAX);
    }

    #[test]
    fn login_reports_the_current_pair() {
        let mut s = Session::new(false);
        s.push_username_char('m');
        s.record_landing(Landing::Letter('z'));
        let r = s.login();
        assert_eq!(r.username, "m");
        assert_eq!(r.password, "z");
        // login leaves the form alone
        assert_eq!(s.password(), "z");
    }
}
