use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use sdi_core::{gender_label, keys, LeaderInformation, Level};
use sdi_wizard::{
    load_form, resolve_class_options, steps, stored_leader, validate::validate_member, FormState,
    MemberSlot, Submission,
};
use serde_json::json;

use super::Session;
use crate::GenderArg;

#[derive(Subcommand, Debug)]
pub enum WizardCommand {
    /// Begin a registration and record where the team comes from.
    Start(StartArgs),

    /// Enter the team leader and team name.
    Leader(LeaderArgs),

    /// Edit member 2 or member 3.
    Members(MembersArgs),

    /// Print the saved registration.
    Show(ShowArgs),

    /// Validate the members and register the team.
    Submit,

    /// Discard the saved registration.
    Reset,
}

pub fn run(session: &Session, cmd: WizardCommand) -> Result<()> {
    match cmd {
        WizardCommand::Start(args) => args.run(session),
        WizardCommand::Leader(args) => args.run(session),
        WizardCommand::Members(args) => args.run(session),
        WizardCommand::Show(args) => args.run(session),
        WizardCommand::Submit => submit(session),
        WizardCommand::Reset => reset(session),
    }
}

// ---------------------------------------------------------------------------
// start
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct StartArgs {
    /// The team does not come from ESATIC.
    #[arg(long)]
    pub external: bool,

    /// JSON file with the level list (`[{"value":1,"label":"..","classes":[..]}]`).
    #[arg(long, value_name = "FILE")]
    pub levels: Option<PathBuf>,
}

impl StartArgs {
    pub fn run(self, session: &Session) -> Result<()> {
        let mut storage = session.storage();
        let levels: Vec<Level> = match &self.levels {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("failed to parse levels in {}", path.display()))?
            }
            None => storage.get(keys::LEVELS_LIST).unwrap_or_default(),
        };

        steps::start(&mut storage, !self.external, &levels)
            .context("failed to save wizard state")?;

        let origin = if self.external { "external" } else { "ESATIC" };
        println!("✓ Registration started ({origin} team, {} level(s))", levels.len());
        if levels.is_empty() {
            println!(
                "{}",
                "  no levels known yet; pass --levels to enable class selection".yellow()
            );
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// leader
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct LeaderArgs {
    /// Level id.
    #[arg(long)]
    pub level: u32,

    #[arg(long)]
    pub matricule: Option<String>,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub email: String,

    /// Homme or Femme.
    #[arg(long)]
    pub gender: GenderArg,

    /// Class id (ESATIC teams).
    #[arg(long)]
    pub class: Option<u32>,

    /// School name (external teams).
    #[arg(long)]
    pub school: Option<String>,

    #[arg(long)]
    pub team_name: String,
}

impl LeaderArgs {
    pub fn run(self, session: &Session) -> Result<()> {
        let mut storage = session.storage();
        let leader = LeaderInformation {
            level: Some(self.level),
            matricule: self.matricule,
            last_name: Some(self.last_name),
            first_name: Some(self.first_name),
            email: Some(self.email),
            gender: Some(self.gender.to_string()),
            school: self.school,
            class: self.class,
            team_name: Some(self.team_name),
        };
        steps::save_leader(&mut storage, &leader).context("leader not saved")?;

        let team = leader.team_name.as_deref().unwrap_or_default();
        println!("✓ Leader saved for team '{team}'");

        let levels: Vec<Level> = storage.get(keys::LEVELS_LIST).unwrap_or_default();
        let classes = resolve_class_options(Some(&leader), &levels);
        if !classes.is_empty() {
            println!("  classes for this level:");
            for option in classes {
                println!("    {:>3}  {}", option.value, option.label);
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// members
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct MembersArgs {
    /// Team position of the member to edit; without it both forms are
    /// re-saved unchanged.
    #[arg(long, value_parser = clap::value_parser!(u8).range(2..=3))]
    pub member: Option<u8>,

    #[arg(long, requires = "member")]
    pub matricule: Option<String>,

    #[arg(long, requires = "member")]
    pub last_name: Option<String>,

    #[arg(long, requires = "member")]
    pub first_name: Option<String>,

    #[arg(long, requires = "member")]
    pub email: Option<String>,

    /// Homme or Femme.
    #[arg(long, requires = "member")]
    pub gender: Option<GenderArg>,

    /// Class id (ESATIC teams).
    #[arg(long, requires = "member")]
    pub class: Option<u32>,

    /// School option id (external teams).
    #[arg(long, requires = "member")]
    pub school: Option<u32>,
}

impl MembersArgs {
    pub fn run(self, session: &Session) -> Result<()> {
        let mut storage = session.storage();
        let mut form = load_form(&storage);

        let Some(position) = self.member else {
            form.persist(&mut storage).context("failed to save member forms")?;
            println!("✓ Saved both members");
            for slot in MemberSlot::ALL {
                print_member(&form, slot);
            }
            return Ok(());
        };
        let slot = MemberSlot::from_team_position(position).context("member must be 2 or 3")?;

        let member = form.member_mut(slot);
        if let Some(v) = self.matricule {
            member.matricule = v;
        }
        if let Some(v) = self.last_name {
            member.last_name = v;
        }
        if let Some(v) = self.first_name {
            member.first_name = v;
        }
        if let Some(v) = self.email {
            member.email = v;
        }
        if let Some(v) = self.gender {
            member.gender = v.0;
        }
        if let Some(v) = self.class {
            member.class = v;
        }
        if let Some(v) = self.school {
            member.school = v;
        }

        form.persist(&mut storage).context("failed to save member forms")?;
        println!("✓ Saved {slot}");
        if let Err(missing) = validate_member(form.member(slot), slot, form.come_from_esatic) {
            println!("{}", format!("  still incomplete: {missing}").yellow());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Print as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ShowArgs {
    pub fn run(self, session: &Session) -> Result<()> {
        let storage = session.storage();
        let form = load_form(&storage);
        let leader = stored_leader(&storage);

        if self.json {
            let members: Vec<_> = MemberSlot::ALL
                .iter()
                .map(|slot| {
                    json!({
                        "position": slot.team_position(),
                        "information": form.member_information(*slot),
                    })
                })
                .collect();
            let view = json!({
                "comeFromEsatic": form.come_from_esatic,
                "leader": leader,
                "classes": form.list_class,
                "members": members,
            });
            println!("{}", serde_json::to_string_pretty(&view)?);
            return Ok(());
        }

        let origin = if form.come_from_esatic { "ESATIC" } else { "external" };
        println!("{} ({origin} team)", "Registration".bold());
        match &leader {
            Some(leader) => {
                let text = |field: &Option<String>| field.clone().unwrap_or_default();
                println!(
                    "  leader    {} {} <{}>  team '{}'",
                    text(&leader.first_name),
                    text(&leader.last_name),
                    text(&leader.email),
                    text(&leader.team_name),
                );
            }
            None => println!("  leader    {}", "not entered".yellow()),
        }
        for slot in MemberSlot::ALL {
            print_member(&form, slot);
        }
        if !form.list_class.is_empty() {
            let options: Vec<String> = form
                .list_class
                .iter()
                .map(|option| format!("{}={}", option.value, option.label))
                .collect();
            println!("  classes   {}", options.join(", "));
        }
        Ok(())
    }
}

fn print_member(form: &FormState, slot: MemberSlot) {
    let member = form.member(slot);
    let class_id = if form.come_from_esatic {
        member.class
    } else {
        member.school
    };
    let class = form
        .class_label(class_id)
        .map(str::to_string)
        .unwrap_or_else(|| if class_id == 0 { "-".into() } else { class_id.to_string() });
    let gender = if member.gender == 0 {
        "-".to_string()
    } else {
        gender_label(member.gender)
    };
    println!(
        "  {slot}  {} {} <{}>  matricule '{}'  gender {gender}  class {class}",
        member.first_name, member.last_name, member.email, member.matricule,
    );
}

// ---------------------------------------------------------------------------
// submit / reset
// ---------------------------------------------------------------------------

fn submit(session: &Session) -> Result<()> {
    let mut storage = session.storage();
    let form = load_form(&storage);
    let client = session.client();
    let mut submission = Submission::new(session.settings.success_delay());

    match submission.submit(&form, &mut storage, &client) {
        Ok(registered) => {
            println!("{} Team '{}' registered", "✓".green(), registered.team.nom_groupe);
            if let Some(message) = registered.reply.message.filter(|m| !m.is_empty()) {
                println!("  {message}");
            }
            Ok(())
        }
        Err(err) => {
            if err.is_retryable() {
                eprintln!("{}", "your entries are kept; fix them and submit again".yellow());
            }
            Err(anyhow::Error::new(err).context("registration not completed"))
        }
    }
}

fn reset(session: &Session) -> Result<()> {
    let mut storage = session.storage();
    let removed = steps::reset(&mut storage).context("failed to discard registration")?;
    println!("✓ Registration discarded ({removed} entr{} removed)", if removed == 1 { "y" } else { "ies" });
    Ok(())
}
