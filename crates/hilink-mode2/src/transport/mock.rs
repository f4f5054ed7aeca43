//! Simulated Hi-Link SDK for demos and testing
//!
//! Behaves like the vendor queue pair: every enqueued request is answered
//! asynchronously by pushing a response onto the shared response queue.
//! The machine registry lives here, the same way it lives inside the real SDK.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hilink_core::models::{
    ActiveProgramInfo, IoPoint, MachineInfoList, MachineIpInfo, MachineStatusReport,
    MachineStatusType, MotorReading, MotorTemperatureInfo, OpStatusInfo, ProductCountInfo,
    ProgramDataInfo, ProgramEntry, ProgramListInfo, ToolLifeEntry, ToolLifeInfo,
};
use hilink_core::{CollectDataType, RequestData, RequestMessage, ResponseData, ResponseMessage};
use parking_lot::{Mutex, RwLock};

use super::ExchangeQueues;
use crate::config::MockConfig;
use crate::TransportError;

const RESULT_OK: i16 = 0;
const RESULT_LICENSE: i16 = -99;
const RESULT_DUPLICATE_UID: i16 = 88;
const RESULT_UNREGISTERED_UID: i16 = -89;
const RESULT_BAD_PAYLOAD: i16 = -1;

/// Requests kept for [`MockExchange::enqueued`]; older ones are dropped
pub const REQUEST_LOG_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
struct SimMachine {
    info: MachineIpInfo,
    status: MachineStatusType,
    programs: Vec<ProgramEntry>,
}

#[derive(Default)]
struct MockState {
    responses: Mutex<VecDeque<ResponseMessage>>,
    /// Registration order is preserved for GetMachineList
    machines: RwLock<Vec<SimMachine>>,
    silenced: RwLock<HashSet<String>>,
    overrides: RwLock<HashMap<(String, CollectDataType), i16>>,
    enqueued: Mutex<VecDeque<RequestMessage>>,
}

impl MockState {
    fn push(&self, response: ResponseMessage) {
        self.responses.lock().push_back(response);
    }

    fn record(&self, request: &RequestMessage) {
        let mut log = self.enqueued.lock();
        if log.len() == REQUEST_LOG_CAPACITY {
            log.pop_front();
        }
        log.push_back(request.clone());
    }
}

/// In-memory vendor queue pair with a simulated machine fleet
pub struct MockExchange {
    latency: Duration,
    activated: bool,
    closed: AtomicBool,
    state: Arc<MockState>,
}

impl MockExchange {
    pub fn new(config: &MockConfig, activation_serial: Option<&str>) -> Self {
        let activated = !config.require_activation
            || activation_serial.is_some_and(|s| !s.trim().is_empty());

        let machines = config
            .machines
            .iter()
            .map(|m| SimMachine {
                info: MachineIpInfo {
                    uid: m.uid.clone(),
                    ip_address: m.ip.clone(),
                    port: m.port,
                },
                status: m.status,
                programs: m.programs.clone(),
            })
            .collect();

        let state = MockState {
            machines: RwLock::new(machines),
            ..Default::default()
        };

        Self {
            latency: Duration::from_millis(config.latency_ms),
            activated,
            closed: AtomicBool::new(false),
            state: Arc::new(state),
        }
    }

    /// Push a response that no request asked for (a stale or foreign reply)
    pub fn inject_response(&self, response: ResponseMessage) {
        self.state.push(response);
    }

    /// Never answer requests for this machine
    pub fn silence(&self, uid: impl Into<String>) {
        self.state.silenced.write().insert(uid.into());
    }

    /// Answer `kind` requests for `uid` with the given vendor result code
    pub fn override_result(&self, uid: impl Into<String>, kind: CollectDataType, code: i16) {
        self.state.overrides.write().insert((uid.into(), kind), code);
    }

    /// The most recent requests received, oldest first
    pub fn enqueued(&self) -> Vec<RequestMessage> {
        self.state.enqueued.lock().iter().cloned().collect()
    }

    pub fn machine_count(&self) -> usize {
        self.state.machines.read().len()
    }

    /// Set the simulated operating state of a machine
    pub fn set_status(&self, uid: &str, status: MachineStatusType) {
        if let Some(machine) = self
            .state
            .machines
            .write()
            .iter_mut()
            .find(|m| m.info.uid == uid)
        {
            machine.status = status;
        }
    }

    /// Make every subsequent queue operation fail
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn respond(&self, request: &RequestMessage) -> ResponseData {
        let kind = request.data_type;

        if !self.activated {
            return coded(kind, RESULT_LICENSE);
        }

        if let Some(code) = self
            .state
            .overrides
            .read()
            .get(&(request.uid.clone(), kind))
        {
            return coded(kind, *code);
        }

        match kind {
            CollectDataType::AddMachine => self.add_machine(&request.data),
            CollectDataType::GetMachineList => ResponseData::MachineList(MachineInfoList {
                result: RESULT_OK,
                machine_ip_info: self
                    .state
                    .machines
                    .read()
                    .iter()
                    .map(|m| m.info.clone())
                    .collect(),
            }),
            _ => self.machine_request(request),
        }
    }

    fn add_machine(&self, data: &RequestData) -> ResponseData {
        let Some(info) = machine_ip(data) else {
            return coded(CollectDataType::AddMachine, RESULT_BAD_PAYLOAD);
        };

        let mut machines = self.state.machines.write();
        if machines.iter().any(|m| m.info.uid == info.uid) {
            return coded(CollectDataType::AddMachine, RESULT_DUPLICATE_UID);
        }

        machines.push(SimMachine {
            info,
            status: MachineStatusType::Ready,
            programs: Vec::new(),
        });

        ResponseData::MachineStatus(MachineStatusReport {
            result: RESULT_OK,
            status: MachineStatusType::Ready,
        })
    }

    /// Requests addressed to one registered machine
    fn machine_request(&self, request: &RequestMessage) -> ResponseData {
        let kind = request.data_type;
        let mut machines = self.state.machines.write();
        let Some(index) = machines.iter().position(|m| m.info.uid == request.uid) else {
            return coded(kind, RESULT_UNREGISTERED_UID);
        };

        match kind {
            CollectDataType::DeleteMachine => {
                machines.remove(index);
                ResponseData::Code(RESULT_OK)
            }
            CollectDataType::UpdateMachine => match machine_ip(&request.data) {
                Some(info) => {
                    let machine = &mut machines[index];
                    machine.info.ip_address = info.ip_address;
                    machine.info.port = info.port;
                    ResponseData::MachineStatus(MachineStatusReport {
                        result: RESULT_OK,
                        status: machine.status,
                    })
                }
                None => coded(kind, RESULT_BAD_PAYLOAD),
            },
            CollectDataType::GetMachineStatus => {
                ResponseData::MachineStatus(MachineStatusReport {
                    result: RESULT_OK,
                    status: machines[index].status,
                })
            }
            CollectDataType::ResetButton => {
                let machine = &mut machines[index];
                if matches!(
                    machine.status,
                    MachineStatusType::Alarm | MachineStatusType::Emergency
                ) {
                    machine.status = MachineStatusType::Ready;
                }
                ResponseData::Code(RESULT_OK)
            }
            CollectDataType::GetProgListInfo => {
                let head_type = match request.data {
                    RequestData::HeadType(h) => h,
                    _ => 0,
                };
                let program_array = if head_type == 0 {
                    machines[index].programs.clone()
                } else {
                    Vec::new()
                };
                ResponseData::ProgramList(ProgramListInfo {
                    result: RESULT_OK,
                    head_type,
                    program_array,
                })
            }
            CollectDataType::GetActivateProgInfo => {
                let active = machines[index].programs.iter().find(|p| p.opened);
                ResponseData::ActiveProgram(ActiveProgramInfo {
                    result: RESULT_OK,
                    main_program_name: active.map(|p| format!("O{:04}", p.no)).unwrap_or_default(),
                    main_program_comment: active.map(|p| p.comment.clone()).unwrap_or_default(),
                    ..Default::default()
                })
            }
            CollectDataType::GetProgDataInfo => {
                let RequestData::ProgramData(req) = &request.data else {
                    return coded(kind, RESULT_BAD_PAYLOAD);
                };
                match machines[index]
                    .programs
                    .iter()
                    .find(|p| p.no == req.program_no)
                {
                    Some(program) => ResponseData::ProgramData(ProgramDataInfo {
                        result: RESULT_OK,
                        head_type: req.head_type,
                        program_no: program.no,
                        program_data: format!(
                            "%\nO{:04}({})\nG00 X0 Y0\nM30\n%",
                            program.no, program.comment
                        ),
                    }),
                    None => coded(kind, RESULT_BAD_PAYLOAD),
                }
            }
            CollectDataType::UpdateProgram => {
                let RequestData::ProgramUpdate(update) = &request.data else {
                    return coded(kind, RESULT_BAD_PAYLOAD);
                };
                let programs = &mut machines[index].programs;
                if !programs.iter().any(|p| p.no == update.program_no) {
                    programs.push(ProgramEntry {
                        no: update.program_no,
                        comment: String::new(),
                        opened: false,
                    });
                }
                ResponseData::Code(RESULT_OK)
            }
            CollectDataType::GetOPStatus => ResponseData::OpStatus(OpStatusInfo {
                result: RESULT_OK,
                io_info: vec![
                    IoPoint { io_uid: 1, status: 1 },
                    IoPoint { io_uid: 2, status: 0 },
                    IoPoint { io_uid: 10, status: 1 },
                ],
            }),
            CollectDataType::GetToolLifeInfo => ResponseData::ToolLife(ToolLifeInfo {
                result: RESULT_OK,
                tool_life: vec![
                    ToolLifeEntry {
                        tool_num: 1,
                        use_count: 120,
                        config_count: 500,
                        warning_count: 450,
                        in_use: true,
                    },
                    ToolLifeEntry {
                        tool_num: 2,
                        use_count: 10,
                        config_count: 300,
                        warning_count: 250,
                        in_use: false,
                    },
                ],
            }),
            CollectDataType::GetMotorTemperature => {
                ResponseData::MotorTemperature(MotorTemperatureInfo {
                    result: RESULT_OK,
                    main_motor_array: vec![
                        reading("X", 31.5),
                        reading("Y", 30.0),
                        reading("Z", 33.25),
                    ],
                    sub_motor_array: vec![],
                    spindle_motor_array: vec![reading("S1", 41.0)],
                })
            }
            CollectDataType::GetProductCount => ResponseData::ProductCount(ProductCountInfo {
                result: RESULT_OK,
                current_count: 42,
                target_count: 100,
            }),
            _ => ResponseData::Code(RESULT_OK),
        }
    }
}

fn reading(name: &str, temperature: f64) -> MotorReading {
    MotorReading {
        name: name.to_string(),
        temperature,
    }
}

fn machine_ip(data: &RequestData) -> Option<MachineIpInfo> {
    match data {
        RequestData::MachineIp(info) => Some(info.clone()),
        RequestData::Json(value) => serde_json::from_value(value.clone()).ok(),
        _ => None,
    }
}

/// The natural response shape for `kind`, carrying only a result code
fn coded(kind: CollectDataType, result: i16) -> ResponseData {
    match kind {
        CollectDataType::AddMachine
        | CollectDataType::UpdateMachine
        | CollectDataType::GetMachineStatus => {
            ResponseData::MachineStatus(MachineStatusReport {
                result,
                status: MachineStatusType::None,
            })
        }
        CollectDataType::GetMachineList => ResponseData::MachineList(MachineInfoList {
            result,
            machine_ip_info: Vec::new(),
        }),
        CollectDataType::GetProgListInfo => ResponseData::ProgramList(ProgramListInfo {
            result,
            ..Default::default()
        }),
        CollectDataType::GetActivateProgInfo => ResponseData::ActiveProgram(ActiveProgramInfo {
            result,
            ..Default::default()
        }),
        CollectDataType::GetProgDataInfo => ResponseData::ProgramData(ProgramDataInfo {
            result,
            ..Default::default()
        }),
        CollectDataType::GetOPStatus => ResponseData::OpStatus(OpStatusInfo {
            result,
            io_info: Vec::new(),
        }),
        CollectDataType::GetToolLifeInfo => ResponseData::ToolLife(ToolLifeInfo {
            result,
            tool_life: Vec::new(),
        }),
        CollectDataType::GetMotorTemperature => {
            ResponseData::MotorTemperature(MotorTemperatureInfo {
                result,
                ..Default::default()
            })
        }
        CollectDataType::GetProductCount => ResponseData::ProductCount(ProductCountInfo {
            result,
            ..Default::default()
        }),
        _ => ResponseData::Code(result),
    }
}

#[async_trait]
impl ExchangeQueues for MockExchange {
    async fn enqueue(&self, request: RequestMessage) -> Result<(), TransportError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }

        tracing::debug!(
            uid = %request.uid,
            data_type = %request.data_type,
            "Mock exchange: request enqueued"
        );
        self.state.record(&request);

        if self.state.silenced.read().contains(&request.uid) {
            return Ok(());
        }

        let response = ResponseMessage::new(
            request.uid.clone(),
            request.data_type,
            self.respond(&request),
        );

        if self.latency.is_zero() {
            self.state.push(response);
        } else {
            let state = self.state.clone();
            let latency = self.latency;
            tokio::spawn(async move {
                tokio::time::sleep(latency).await;
                state.push(response);
            });
        }

        Ok(())
    }

    async fn try_dequeue(&self) -> Result<Option<ResponseMessage>, TransportError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }
        Ok(self.state.responses.lock().pop_front())
    }

    async fn pending_responses(&self) -> usize {
        self.state.responses.lock().len()
    }
}
