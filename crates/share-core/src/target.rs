//! Destination resolution for one sync action.
//!
//! The user picks between their personal space and any of their teams; the
//! team list is fetched fresh per action since membership can change between
//! invocations.

use crate::annotation::PERSONAL_PATH;
use crate::host::DialogButton;
use crate::remote::Team;

/// Id of the always-offered cancel choice.
pub const CANCEL_ID: &str = "cancel";

/// Resolved destination for a sync action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTarget {
    /// `"user"` for the personal space, otherwise the team routing slug.
    pub path: String,
    /// Display name.
    pub title: String,
}

impl SyncTarget {
    pub fn personal() -> Self {
        Self {
            path: PERSONAL_PATH.to_string(),
            title: PERSONAL_PATH.to_string(),
        }
    }

    pub fn team(team: &Team) -> Self {
        Self {
            path: team.path.clone(),
            title: team.name.clone(),
        }
    }

    pub fn is_personal(&self) -> bool {
        self.path == PERSONAL_PATH
    }
}

/// Outcome of the destination dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Cancelled,
    Target(SyncTarget),
}

/// Buttons for the destination dialog: personal space first, every known
/// team next, cancel last.
pub fn target_buttons(teams: &[Team]) -> Vec<DialogButton> {
    let mut buttons = vec![DialogButton {
        id: PERSONAL_PATH.to_string(),
        title: PERSONAL_PATH.to_string(),
    }];
    buttons.extend(teams.iter().map(|team| DialogButton {
        id: team.path.clone(),
        title: team.name.clone(),
    }));
    buttons.push(DialogButton {
        id: CANCEL_ID.to_string(),
        title: String::new(),
    });
    buttons
}

/// Map a dialog selection back to a target. Returns `None` for ids outside
/// the offered set; the selection must come from [`target_buttons`].
pub fn resolve_choice(selection: &str, teams: &[Team]) -> Option<Resolution> {
    if selection == CANCEL_ID {
        return Some(Resolution::Cancelled);
    }
    if selection == PERSONAL_PATH {
        return Some(Resolution::Target(SyncTarget::personal()));
    }
    teams
        .iter()
        .find(|team| team.path == selection)
        .map(|team| Resolution::Target(SyncTarget::team(team)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teams() -> Vec<Team> {
        vec![
            Team {
                name: "Team A".to_string(),
                path: "teamA".to_string(),
            },
            Team {
                name: "Team B".to_string(),
                path: "teamB".to_string(),
            },
        ]
    }

    #[test]
    fn buttons_offer_personal_first_and_cancel_last() {
        let buttons = target_buttons(&teams());
        assert_eq!(buttons.len(), 4);
        assert_eq!(buttons[0].id, "user");
        assert_eq!(buttons[1].id, "teamA");
        assert_eq!(buttons[1].title, "Team A");
        assert_eq!(buttons[2].id, "teamB");
        assert_eq!(buttons[3].id, "cancel");
        assert_eq!(buttons[3].title, "");
    }

    #[test]
    fn resolves_personal() {
        let resolved = resolve_choice("user", &teams()).unwrap();
        assert_eq!(resolved, Resolution::Target(SyncTarget::personal()));
    }

    #[test]
    fn resolves_team_by_path() {
        let resolved = resolve_choice("teamB", &teams()).unwrap();
        match resolved {
            Resolution::Target(target) => {
                assert_eq!(target.path, "teamB");
                assert_eq!(target.title, "Team B");
                assert!(!target.is_personal());
            }
            Resolution::Cancelled => panic!("expected a target"),
        }
    }

    #[test]
    fn resolves_cancel() {
        assert_eq!(
            resolve_choice("cancel", &teams()),
            Some(Resolution::Cancelled)
        );
    }

    #[test]
    fn unknown_selection_is_a_contract_violation() {
        assert_eq!(resolve_choice("nope", &teams()), None);
    }
}
