//! Single-task driver for one ERTM channel built on top of [`ErtmController`].
//!
//! The runner owns the controller and serializes every event it consumes (PDUs
//! from the link, timer expiries, commands from producer tasks), so the
//! controller itself never needs locking. It optionally offers:
//!
//! * a command handle (`ErtmHandle`) to submit SDUs, toggle local busy and
//!   disconnect;
//! * an SDU receiver (`ErtmSdus`) yielding reassembled SDUs in order.
//!
//! The host provides pre-allocated [`embassy_sync::channel::Channel`] instances
//! for the features it needs, with whichever [`RawMutex`] suits its executor.

use alloc::collections::VecDeque;
use bytes::Bytes;
use core::fmt::Debug;

use embassy_sync::{
    blocking_mutex::raw::RawMutex,
    channel::{Channel, Receiver, Sender},
};
use futures_util::{future::select, future::Either, pin_mut};

use crate::core::Cid;
use crate::error::{CloseReason, ErtmRunError};
use crate::protocol::ertm::{config::ErtmConfig, ErtmController};
use crate::protocol::transport::traits::{
    ertm_timer::ErtmTimer, l2cap_link::L2capLink, scheduler::Scheduler,
};

/// Counts PDUs the controller made ready since the runner last flushed.
#[derive(Debug, Default)]
struct ReadyCounter {
    ready: usize,
}

impl Scheduler for ReadyCounter {
    fn on_packets_ready(&mut self, _cid: Cid, count: usize) {
        self.ready += count;
    }
}

type DriverController = ErtmController<ReadyCounter, VecDeque<Bytes>>;

/// Service assembling the driver components.
pub struct ErtmService<
    'a,
    L: L2capLink,
    T: ErtmTimer,
    M: RawMutex,
    const CMD_CAP: usize,
    const SDU_CAP: usize,
> where
    L::Error: Debug,
{
    controller: DriverController,
    link: L,
    timer: T,
    command_channel: Option<&'a Channel<M, ErtmCommand, CMD_CAP>>,
    sdu_channel: Option<&'a Channel<M, Bytes, SDU_CAP>>,
}

impl<'a, L, T, M, const CMD_CAP: usize, const SDU_CAP: usize>
    ErtmService<'a, L, T, M, CMD_CAP, SDU_CAP>
where
    L: L2capLink,
    L::Error: Debug,
    T: ErtmTimer,
    M: RawMutex,
{
    /// Bring up a controller for `config` on top of `link`.
    pub fn new(
        config: ErtmConfig,
        link: L,
        timer: T,
        command_channel: Option<&'a Channel<M, ErtmCommand, CMD_CAP>>,
        sdu_channel: Option<&'a Channel<M, Bytes, SDU_CAP>>,
    ) -> Self {
        Self {
            controller: ErtmController::new(config, ReadyCounter::default(), VecDeque::new()),
            link,
            timer,
            command_channel,
            sdu_channel,
        }
    }

    /// Split into handle/receiver/runner components.
    pub fn into_parts(self) -> ErtmServiceParts<'a, L, T, M, CMD_CAP, SDU_CAP> {
        let handle = self.command_channel.map(|channel| ErtmHandle {
            sender: channel.sender(),
        });
        let sdus = self.sdu_channel.map(|channel| ErtmSdus {
            receiver: channel.receiver(),
        });
        ErtmServiceParts {
            handle,
            sdus,
            runner: ErtmRunner {
                controller: self.controller,
                link: self.link,
                timer: self.timer,
                command_channel: self.command_channel,
                sdu_channel: self.sdu_channel,
            },
        }
    }
}

/// Bundle returned by [`ErtmService::into_parts`].
pub struct ErtmServiceParts<'a, L, T, M, const CMD_CAP: usize, const SDU_CAP: usize>
where
    L: L2capLink,
    L::Error: Debug,
    T: ErtmTimer,
    M: RawMutex,
{
    pub handle: Option<ErtmHandle<'a, M, CMD_CAP>>,
    pub sdus: Option<ErtmSdus<'a, M, SDU_CAP>>,
    pub runner: ErtmRunner<'a, L, T, M, CMD_CAP, SDU_CAP>,
}

//==================================================================================RUNNER
/// Runner that drives the channel until it closes.
pub struct ErtmRunner<'a, L, T, M, const CMD_CAP: usize, const SDU_CAP: usize>
where
    L: L2capLink,
    L::Error: Debug,
    T: ErtmTimer,
    M: RawMutex,
{
    controller: DriverController,
    link: L,
    timer: T,
    command_channel: Option<&'a Channel<M, ErtmCommand, CMD_CAP>>,
    sdu_channel: Option<&'a Channel<M, Bytes, SDU_CAP>>,
}

enum DriverEvent<E> {
    Pdu(Result<Bytes, E>),
    Command(ErtmCommand),
    Alarm,
}

impl<'a, L, T, M, const CMD_CAP: usize, const SDU_CAP: usize>
    ErtmRunner<'a, L, T, M, CMD_CAP, SDU_CAP>
where
    L: L2capLink,
    L::Error: Debug,
    T: ErtmTimer,
    M: RawMutex,
{
    /// Run the channel. Returns why it closed, or the link error that stopped it.
    pub async fn drive(mut self) -> Result<CloseReason, ErtmRunError<L::Error>> {
        let command_channel = self.command_channel;

        loop {
            self.flush().await?;
            if let Some(reason) = self.controller.close_reason() {
                return Ok(reason);
            }

            let deadline = self.controller.poll_timeout();
            let event = {
                let recv_future = self.link.recv();
                let timer = &mut self.timer;
                let alarm_future = async move {
                    match deadline {
                        Some(deadline) => timer.wait_until(deadline).await,
                        None => core::future::pending::<()>().await,
                    }
                };
                let cmd_future = async move {
                    match command_channel {
                        Some(cmd_ch) => cmd_ch.receive().await,
                        None => core::future::pending::<ErtmCommand>().await,
                    }
                };
                pin_mut!(recv_future);
                pin_mut!(alarm_future);
                pin_mut!(cmd_future);

                match select(select(recv_future, cmd_future), alarm_future).await {
                    Either::Left((Either::Left((result, _)), _)) => DriverEvent::Pdu(result),
                    Either::Left((Either::Right((command, _)), _)) => DriverEvent::Command(command),
                    Either::Right(((), _)) => DriverEvent::Alarm,
                }
            };

            let now = self.timer.now();
            match event {
                DriverEvent::Pdu(Ok(pdu)) => self.controller.on_pdu(pdu, now),
                DriverEvent::Pdu(Err(err)) => return Err(ErtmRunError::Receive(err)),
                DriverEvent::Command(command) => self.handle_command(command, now),
                DriverEvent::Alarm => self.controller.handle_timeout(now),
            }
        }
    }

    fn handle_command(&mut self, command: ErtmCommand, now: embassy_time::Instant) {
        match command {
            ErtmCommand::Submit(sdu) => {
                if let Err(_err) = self.controller.submit(sdu, now) {
                    #[cfg(feature = "defmt")]
                    defmt::warn!(
                        "[ertm] cid {}: SDU dropped: {}",
                        self.controller.config().local_cid.value(),
                        _err
                    );
                }
            }
            ErtmCommand::SetLocalBusy(busy) => self.controller.set_local_busy(busy, now),
            ErtmCommand::Disconnect => self.controller.shutdown(),
        }
    }

    /// Push queued PDUs to the link and delivered SDUs to the SDU channel.
    async fn flush(&mut self) -> Result<(), ErtmRunError<L::Error>> {
        if self.controller.scheduler().ready > 0 {
            while let Some(pdu) = self.controller.next_packet() {
                self.link.send(&pdu).await.map_err(ErtmRunError::Send)?;
            }
            self.controller.scheduler_mut().ready = 0;
        }

        let sdu_channel = self.sdu_channel;
        while let Some(sdu) = self.controller.sink_mut().pop_front() {
            if let Some(sdu_ch) = sdu_channel {
                sdu_ch.send(sdu).await;
            }
        }
        Ok(())
    }
}

//==================================================================================HANDLES
/// Command handle (optional).
pub struct ErtmHandle<'a, M: RawMutex, const CMD_CAP: usize> {
    sender: Sender<'a, M, ErtmCommand, CMD_CAP>,
}

impl<'a, M: RawMutex, const CMD_CAP: usize> ErtmHandle<'a, M, CMD_CAP> {
    /// Queue an SDU. SDUs the controller refuses (closed channel, full pending
    /// queue) are dropped by the runner.
    pub async fn submit(&self, sdu: impl Into<Bytes>) {
        self.sender.send(ErtmCommand::Submit(sdu.into())).await;
    }

    pub async fn set_local_busy(&self, busy: bool) {
        self.sender.send(ErtmCommand::SetLocalBusy(busy)).await;
    }

    /// Stop the runner; `drive` then returns [`CloseReason::LocalShutdown`].
    pub async fn disconnect(&self) {
        self.sender.send(ErtmCommand::Disconnect).await;
    }
}

/// Optional receiver returning reassembled SDUs.
pub struct ErtmSdus<'a, M: RawMutex, const SDU_CAP: usize> {
    receiver: Receiver<'a, M, Bytes, SDU_CAP>,
}

impl<'a, M: RawMutex, const SDU_CAP: usize> ErtmSdus<'a, M, SDU_CAP> {
    pub async fn recv(&mut self) -> Bytes {
        self.receiver.receive().await
    }
}

/// Commands queued by producer tasks.
#[derive(Clone, Debug)]
pub enum ErtmCommand {
    Submit(Bytes),
    SetLocalBusy(bool),
    Disconnect,
}
