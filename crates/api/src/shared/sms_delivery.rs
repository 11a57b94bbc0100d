use salon_notifier_domain::{
    sms::{build_confirmation_sms, build_reminder_sms},
    NotificationContext, SmsConfirmationType,
};
use salon_notifier_infra::NotifierContext;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsKind {
    Confirmation(SmsConfirmationType),
    Reminder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsOutcome {
    Sent,
    /// Another actor holds the flag, or the appointment is no longer eligible
    AlreadyClaimed,
    NoPhone,
    /// Checked by the caller before claiming, the appointment does not qualify
    Ineligible,
    /// Claim or send failed, the flag is left as it was before the attempt
    Failed,
}

async fn claim(
    kind: SmsKind,
    n: &NotificationContext,
    ctx: &NotifierContext,
) -> anyhow::Result<bool> {
    let repo = &ctx.repos.appointments;
    match kind {
        SmsKind::Confirmation(t) => repo.claim_sms_confirmation(&n.appointment.id, t).await,
        SmsKind::Reminder => repo.claim_sms_reminder(&n.appointment.id).await,
    }
}

async fn release(kind: SmsKind, n: &NotificationContext, ctx: &NotifierContext) {
    let repo = &ctx.repos.appointments;
    let res = match kind {
        SmsKind::Confirmation(t) => repo.release_sms_confirmation(&n.appointment.id, t).await,
        SmsKind::Reminder => repo.release_sms_reminder(&n.appointment.id).await,
    };
    if let Err(e) = res {
        error!(
            "Unable to release the {:?} sms claim of appointment: {}. Error: {:?}",
            kind, n.appointment.id, e
        );
    }
}

/// Claims the sms flag, sends the sms when the claim is won and gives the
/// claim back when the provider fails so that a later attempt can retry.
pub async fn claim_and_send_sms(
    kind: SmsKind,
    n: &NotificationContext,
    ctx: &NotifierContext,
) -> SmsOutcome {
    let appointment_id = &n.appointment.id;
    let phone = match &n.client.phone {
        Some(phone) => phone,
        None => {
            warn!(
                "Client: {} of appointment: {} has no phone number, {:?} sms not sent",
                n.client.id, appointment_id, kind
            );
            return SmsOutcome::NoPhone;
        }
    };

    match claim(kind, n, ctx).await {
        Ok(true) => (),
        Ok(false) => {
            info!(
                "{:?} sms of appointment: {} is already claimed",
                kind, appointment_id
            );
            return SmsOutcome::AlreadyClaimed;
        }
        Err(e) => {
            error!(
                "Unable to claim the {:?} sms of appointment: {}. Error: {:?}",
                kind, appointment_id, e
            );
            return SmsOutcome::Failed;
        }
    }

    let text = match kind {
        SmsKind::Confirmation(_) => build_confirmation_sms(n),
        SmsKind::Reminder => build_reminder_sms(n),
    };
    match ctx.senders.sms.send(phone, &text).await {
        Ok(receipt) => {
            info!(
                "{:?} sms of appointment: {} sent with id: {:?}",
                kind, appointment_id, receipt.message_id
            );
            SmsOutcome::Sent
        }
        Err(e) => {
            error!(
                "Unable to send the {:?} sms of appointment: {}. Error: {}",
                kind, appointment_id, e
            );
            release(kind, n, ctx).await;
            SmsOutcome::Failed
        }
    }
}
