//! Rating store operations

use super::UnitOfWork;
use crate::error::Result;
use crate::types::Team;
use tracing::debug;

impl UnitOfWork<'_> {
    /// Fetch a team, creating it at `base_rating` on first sight.
    ///
    /// A newly created team is visible to every later read in this unit of
    /// work. An existing team whose stored display name differs from a
    /// non-empty `display_name` is renamed; its rating is left alone.
    pub fn get_or_create(&mut self, team_key: &str, display_name: &str, base_rating: f64) -> Result<Team> {
        match self.read_team(team_key)? {
            Some(mut team) => {
                if !display_name.is_empty() && team.display_name != display_name {
                    debug!(
                        team = team_key,
                        old = %team.display_name,
                        new = display_name,
                        "Updating team display name"
                    );
                    team.display_name = display_name.to_string();
                    self.stage_team(team.clone());
                }
                Ok(team)
            }
            None => {
                debug!(team = team_key, rating = base_rating, "Creating team");
                let team = Team::new(team_key, display_name, base_rating);
                self.stage_team(team.clone());
                Ok(team)
            }
        }
    }

    /// Upsert a team's rating. A missing team is created with its key as the
    /// display name.
    pub fn set_rating(&mut self, team_key: &str, new_rating: f64) -> Result<()> {
        let team = match self.read_team(team_key)? {
            Some(mut team) => {
                team.rating = new_rating;
                team
            }
            None => Team::new(team_key, team_key, new_rating),
        };
        self.stage_team(team);
        Ok(())
    }

    /// Put every existing team back at `base_rating`, returning how many
    /// teams that covers. Names are kept and no team is removed.
    pub fn reset_all(&mut self, base_rating: f64) -> Result<usize> {
        let mut count = self.store().team_count()?;
        let staged_keys: Vec<String> = self.changes().teams.keys().cloned().collect();
        for key in &staged_keys {
            if self.store().load_team(key)?.is_none() {
                count += 1;
            }
        }

        let changes = self.changes_mut();
        changes.reset_ratings = Some(base_rating);
        for team in changes.teams.values_mut() {
            team.rating = base_rating;
        }

        Ok(count)
    }
}
