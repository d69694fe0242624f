use garagepi_api::*;
use utoipa::OpenApi;

use crate::handles;

#[derive(OpenApi)]
#[openapi(
    paths(
        handles::get_info,
        handles::get_door,
        handles::get_air,
        handles::trigger_door,
    ),
    components(schemas(
        DoorStatus,
        DoorPosition,
        DoorDirection,
        Sample,
        HistoryPoint,
        AirResponse,
        SystemStatus,
        EndpointInfo,
        ServiceInfo,
    )),
    tags(
        (name = "info", description = "Host status and endpoint listing"),
        (name = "door", description = "Door position tracking"),
        (name = "air", description = "Garage temperature and humidity"),
        (name = "trigger", description = "Door opener relay"),
    )
)]
pub struct ApiDoc;
